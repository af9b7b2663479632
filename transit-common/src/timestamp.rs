use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wall-clock instant carried as Unix epoch milliseconds.
///
/// Serializes as a decimal string (`"1567634735123"`); accepts either that
/// string or a bare integer on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MillisecondTimestamp(DateTime<Utc>);

impl MillisecondTimestamp {
    /// The current time, truncated to millisecond precision.
    pub fn now() -> Self {
        Self::from_millis(Utc::now().timestamp_millis())
    }

    /// Build from epoch milliseconds. Out-of-range values clamp to the epoch;
    /// use [`try_from_millis`](Self::try_from_millis) to reject them instead.
    pub fn from_millis(millis: i64) -> Self {
        Self::try_from_millis(millis).unwrap_or(Self(DateTime::UNIX_EPOCH))
    }

    /// Build from epoch milliseconds, or `None` if chrono cannot represent them.
    pub fn try_from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Epoch milliseconds.
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Shift forward by the given number of seconds.
    pub fn plus_secs(&self, secs: i64) -> Self {
        Self::from_millis(self.as_millis().saturating_add(secs.saturating_mul(1000)))
    }
}

impl fmt::Display for MillisecondTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_millis())
    }
}

impl Serialize for MillisecondTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_millis().to_string())
    }
}

impl<'de> Deserialize<'de> for MillisecondTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MillisVisitor;

        impl Visitor<'_> for MillisVisitor {
            type Value = MillisecondTimestamp;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("epoch milliseconds as a string or integer")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                MillisecondTimestamp::try_from_millis(v)
                    .ok_or_else(|| E::custom(format!("timestamp out of range: {}", v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                let millis = i64::try_from(v).map_err(E::custom)?;
                self.visit_i64(millis)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                let millis = v.trim().parse::<i64>().map_err(E::custom)?;
                self.visit_i64(millis)
            }
        }

        deserializer.deserialize_any(MillisVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_string() {
        let ts = MillisecondTimestamp::from_millis(1567634735123);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"1567634735123\"");
    }

    #[test]
    fn test_deserializes_string_and_integer() {
        let from_str: MillisecondTimestamp = serde_json::from_str("\"1567634735123\"").unwrap();
        let from_int: MillisecondTimestamp = serde_json::from_str("1567634735123").unwrap();

        assert_eq!(from_str, from_int);
        assert_eq!(from_str.as_millis(), 1567634735123);
    }

    #[test]
    fn test_rejects_garbage() {
        let result: Result<MillisecondTimestamp, _> = serde_json::from_str("\"yesterday\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let from_str: Result<MillisecondTimestamp, _> = serde_json::from_str("\"9000000000000000\"");
        let from_int: Result<MillisecondTimestamp, _> = serde_json::from_str("-9000000000000000");

        assert!(from_str.unwrap_err().to_string().contains("out of range"));
        assert!(from_int.is_err());
        assert!(MillisecondTimestamp::try_from_millis(9_000_000_000_000_000).is_none());
    }

    #[test]
    fn test_plus_secs() {
        let ts = MillisecondTimestamp::from_millis(1_000);
        assert_eq!(ts.plus_secs(5).as_millis(), 6_000);
    }
}
