//! End-to-end command execution against the mock backend.

use std::path::Path;

use transit_cli::commands::{Command, execute};
use transit_client::{MockBackend, Operation, TransitClient, TransitConfig};

fn config() -> TransitConfig {
    TransitConfig::parse(
        r#"{
            credentials: { user: "admin", password: "secret" },
            agent: { app_type: "VEMA", agent_id: "cli-test" },
        }"#,
    )
    .unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run(command: Command, backend: MockBackend) -> (anyhow::Result<()>, String, TransitClient<MockBackend>) {
    let client = TransitClient::new(backend);
    let mut out = Vec::new();
    let result = execute(&command, &client, &config(), &mut out);
    (result, String::from_utf8(out).unwrap(), client)
}

#[test]
fn test_send_metrics_wraps_in_session_and_stamps_context() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "metrics.json",
        r#"{"resources":[{"name":"h1","type":"host","status":"HOST_UP","lastCheckTime":"1"}]}"#,
    );

    let (result, out, client) = run(Command::SendMetrics { file }, MockBackend::new());
    result.unwrap();

    assert_eq!(out.trim(), "sent 1 resource(s)");
    assert_eq!(
        client.backend().operations(),
        vec![
            Operation::Connect,
            Operation::SendResourcesWithMetrics,
            Operation::Disconnect
        ]
    );

    let payload = client.backend().calls()[1].payload.clone().unwrap();
    let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(value["context"]["agentId"], "cli-test");
}

#[test]
fn test_existing_context_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "inventory.json",
        r#"{
            "context": {"appType":"X","agentId":"from-file","traceToken":"t","timeStamp":"5","version":"1"},
            "resources": [{"name":"h1","type":"host"}],
            "groups": [{"groupName":"G","type":"HostGroup"}]
        }"#,
    );

    let (result, out, client) = run(Command::SyncInventory { file }, MockBackend::new());
    result.unwrap();

    assert_eq!(out.trim(), "synchronized 1 resource(s), 1 group(s)");
    let payload = client.backend().calls()[1].payload.clone().unwrap();
    assert!(payload.contains("\"agentId\":\"from-file\""));
}

#[test]
fn test_list_metrics_prints_json() {
    let backend = MockBackend::new().with_list_metrics(r#"[{"name":"cpu.load","unit":"1"}]"#);

    let (result, out, _) = run(Command::ListMetrics, backend);
    result.unwrap();

    let printed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(printed[0]["name"], "cpu.load");
}

#[test]
fn test_failure_still_disconnects() {
    let backend = MockBackend::new().with_failure(Operation::ListMetrics, "nats: no servers");

    let (result, out, client) = run(Command::ListMetrics, backend);

    let err = result.unwrap_err();
    assert!(err.to_string().contains("nats: no servers"));
    assert!(out.is_empty());
    assert_eq!(
        client.backend().operations().last(),
        Some(&Operation::Disconnect)
    );
}

#[test]
fn test_connect_only() {
    let (result, out, client) = run(Command::Connect, MockBackend::new());
    result.unwrap();

    assert_eq!(out.trim(), "connected as admin");
    assert_eq!(client.backend().operations(), vec![Operation::Connect]);
}

#[test]
fn test_test_resource_echo() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "resource.json",
        r#"{"name":"h1","type":"host","status":"HOST_UP","lastCheckTime":"1"}"#,
    );

    let (result, out, _) = run(Command::TestResource { file }, MockBackend::new());
    result.unwrap();

    let printed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(printed["status"], "SERVICE_PENDING");
}

#[test]
fn test_run_is_rejected() {
    let (result, _, client) = run(Command::Run, MockBackend::new());
    assert!(result.is_err());
    assert!(client.backend().operations().is_empty());
}
