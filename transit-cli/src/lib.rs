//! Command-line client for the transit library.
//!
//! One-shot commands connect, perform a single operation and disconnect.
//! `run` starts the feeder loop from the configuration.
//!
//! ```text
//! transit --config transit.json5 list-metrics
//! transit --config transit.json5 send-metrics metrics.json
//! transit --config transit.json5 sync-inventory inventory.json
//! transit --config transit.json5 run
//! ```

pub mod commands;
