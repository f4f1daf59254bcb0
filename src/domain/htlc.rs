//! HTLC lifecycle events extracted from node logs.

use serde::{Deserialize, Serialize};

/// Final outcome of an HTLC circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Settle,
    Fail,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Settle => write!(f, "SETTLE"),
            Outcome::Fail => write!(f, "FAIL"),
        }
    }
}

/// An HTLC offered to a peer (`Sending UpdateAddHTLC`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtlcAdd {
    /// Seconds since Unix epoch.
    pub timestamp: f64,
    pub htlc_id: u64,
    pub payment_hash: String,
}

/// A completed circuit (`Closed completed SETTLE|FAIL circuit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtlcResolve {
    /// Seconds since Unix epoch.
    pub timestamp: f64,
    pub outcome: Outcome,
    pub htlc_id: u64,
    pub payment_hash: String,
}
