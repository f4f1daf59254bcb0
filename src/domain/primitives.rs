//! Domain primitives: ChannelId, TimestampNs.

use serde::{Deserialize, Serialize};

/// Time in nanoseconds since Unix epoch, as recorded by the forwarding node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimestampNs(pub i64);

impl TimestampNs {
    /// Create a TimestampNs from nanoseconds.
    pub fn new(ns: i64) -> Self {
        TimestampNs(ns)
    }

    /// Get the underlying nanoseconds value.
    pub fn as_ns(&self) -> i64 {
        self.0
    }

    /// Fractional seconds since Unix epoch.
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1e9
    }
}

/// Opaque channel (link) identifier, usually a short channel id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl ChannelId {
    /// Create a ChannelId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        ChannelId(id.into())
    }

    /// Get the id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        ChannelId(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_ns_to_secs() {
        let ts = TimestampNs::new(1_700_000_000_500_000_000);
        assert!((ts.as_secs_f64() - 1_700_000_000.5).abs() < 1e-6);
    }

    #[test]
    fn test_channel_id_display() {
        let id = ChannelId::new("870123x1234x0");
        assert_eq!(id.to_string(), "870123x1234x0");
    }

    #[test]
    fn test_channel_id_ordering_is_lexicographic() {
        let a = ChannelId::from("10");
        let b = ChannelId::from("9");
        assert!(a < b);
    }
}
