//! Forward event: one payment routed through the node.

use crate::domain::{ChannelId, TimestampNs};
use serde::{Deserialize, Serialize};

/// A single forwarded payment, entering on `chan_id_in` and leaving on `chan_id_out`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardEvent {
    /// Time the forward settled.
    pub timestamp: TimestampNs,
    /// Incoming link (None when the log carried an empty id).
    pub chan_id_in: Option<ChannelId>,
    /// Outgoing link (None when the log carried an empty id).
    pub chan_id_out: Option<ChannelId>,
    pub amt_in_msat: u64,
    pub amt_out_msat: u64,
    pub fee_msat: u64,
}

impl ForwardEvent {
    /// Create a new ForwardEvent. Empty channel ids are treated as absent.
    pub fn new(
        timestamp: TimestampNs,
        chan_id_in: &str,
        chan_id_out: &str,
        amt_in_msat: u64,
        amt_out_msat: u64,
        fee_msat: u64,
    ) -> Self {
        Self {
            timestamp,
            chan_id_in: non_empty(chan_id_in),
            chan_id_out: non_empty(chan_id_out),
            amt_in_msat,
            amt_out_msat,
            fee_msat,
        }
    }

    /// Timestamp in fractional seconds.
    pub fn time_secs(&self) -> f64 {
        self.timestamp.as_secs_f64()
    }
}

fn non_empty(id: &str) -> Option<ChannelId> {
    let id = id.trim();
    (!id.is_empty()).then(|| ChannelId::new(id))
}
