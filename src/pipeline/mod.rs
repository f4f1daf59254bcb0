//! End-to-end computations that drive the engines over a forwarding history.
//!
//! This module provides:
//! - Score snapshots (reputation, revenue, decaying utilization) as of a timestamp
//! - Time-weighted slot and liquidity occupancy histograms
//! - HTLC resolution-time statistics from node logs

use crate::domain::{is_time_ordered, sort_forwards_by_time, ForwardEvent};
use std::borrow::Cow;

pub mod resolution;
pub mod scores;
pub mod utilization;

pub use resolution::analyze_log_dir;
pub use scores::compute_scores;
pub use utilization::{analyze_utilization, UtilizationSummary};

/// Borrow `forwards` if already time-ordered, otherwise sort a copy.
fn time_ordered(forwards: &[ForwardEvent]) -> Cow<'_, [ForwardEvent]> {
    if is_time_ordered(forwards) {
        return Cow::Borrowed(forwards);
    }
    tracing::debug!(forwards = forwards.len(), "Sorting forwards by timestamp");
    let mut sorted = forwards.to_vec();
    sort_forwards_by_time(&mut sorted);
    Cow::Owned(sorted)
}
