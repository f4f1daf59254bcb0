//! HTLC resolution-time statistics from matched add/resolve events.

use crate::domain::{HtlcAdd, HtlcResolve, Outcome};
use serde::Serialize;
use std::collections::HashMap;

/// Upper bounds (exclusive, seconds) and labels of the resolution-time buckets.
const RESOLUTION_BUCKETS: [(f64, &str); 9] = [
    (1.0, "< 1s"),
    (5.0, "< 5s"),
    (10.0, "< 10s"),
    (30.0, "< 30s"),
    (60.0, "< 1min"),
    (90.0, "< 90s"),
    (120.0, "< 2min"),
    (180.0, "< 3min"),
    (300.0, "< 5min"),
];
const OVERFLOW_LABEL: &str = "> 5min";

/// Number of resolution-time buckets, including the overflow bucket.
pub const RESOLUTION_BUCKET_COUNT: usize = RESOLUTION_BUCKETS.len() + 1;

/// Index of the bucket containing `seconds`.
pub fn resolution_bucket(seconds: f64) -> usize {
    RESOLUTION_BUCKETS
        .iter()
        .position(|&(bound, _)| seconds < bound)
        .unwrap_or(RESOLUTION_BUCKETS.len())
}

/// Labels in bucket order.
pub fn resolution_bucket_labels() -> impl Iterator<Item = &'static str> {
    RESOLUTION_BUCKETS
        .iter()
        .map(|&(_, label)| label)
        .chain(std::iter::once(OVERFLOW_LABEL))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub settle: [u64; RESOLUTION_BUCKET_COUNT],
    pub fail: [u64; RESOLUTION_BUCKET_COUNT],
    pub settle_total: u64,
    pub fail_total: u64,
    /// Resolve events with no preceding add.
    pub unmatched: u64,
    /// Adds never resolved (still in flight at the end of the logs).
    pub unresolved: u64,
}

impl ResolutionStats {
    pub fn total(&self) -> u64 {
        self.settle_total + self.fail_total
    }

    pub fn counts(&self, outcome: Outcome) -> &[u64; RESOLUTION_BUCKET_COUNT] {
        match outcome {
            Outcome::Settle => &self.settle,
            Outcome::Fail => &self.fail,
        }
    }

    pub fn outcome_total(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Settle => self.settle_total,
            Outcome::Fail => self.fail_total,
        }
    }
}

/// Match resolves to adds on `(payment_hash, htlc_id)` and bucket the elapsed time.
///
/// Each add is consumed by its first matching resolve. A later add with the same key
/// replaces an earlier unmatched one.
pub fn compute_resolution_stats(adds: &[HtlcAdd], resolves: &[HtlcResolve]) -> ResolutionStats {
    let mut add_times: HashMap<(&str, u64), f64> = adds
        .iter()
        .map(|a| ((a.payment_hash.as_str(), a.htlc_id), a.timestamp))
        .collect();

    let mut stats = ResolutionStats {
        settle: [0; RESOLUTION_BUCKET_COUNT],
        fail: [0; RESOLUTION_BUCKET_COUNT],
        settle_total: 0,
        fail_total: 0,
        unmatched: 0,
        unresolved: 0,
    };

    for resolve in resolves {
        let key = (resolve.payment_hash.as_str(), resolve.htlc_id);
        let Some(added_at) = add_times.remove(&key) else {
            stats.unmatched += 1;
            continue;
        };

        let bucket = resolution_bucket(resolve.timestamp - added_at);
        match resolve.outcome {
            Outcome::Settle => {
                stats.settle[bucket] += 1;
                stats.settle_total += 1;
            }
            Outcome::Fail => {
                stats.fail[bucket] += 1;
                stats.fail_total += 1;
            }
        }
    }

    stats.unresolved = add_times.len() as u64;
    stats
}
