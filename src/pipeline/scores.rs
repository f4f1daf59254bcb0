//! Reputation and revenue snapshot over a forwarding history.

use super::time_ordered;
use crate::config::Config;
use crate::datasource::ChannelInfoMap;
use crate::domain::ForwardEvent;
use crate::engine::{AggregatorParams, ChannelMetricsAggregator, ChannelScore, MetricsError};

/// Credit every forward and read all channels as of `as_of` (seconds since epoch).
///
/// The revenue horizon starts `config.lookback_secs` before `as_of`.
pub fn compute_scores(
    forwards: &[ForwardEvent],
    channel_info: &ChannelInfoMap,
    config: &Config,
    as_of: f64,
) -> Result<Vec<ChannelScore>, MetricsError> {
    let params = AggregatorParams {
        start_ts: as_of - config.lookback_secs,
        window_secs: config.revenue_window_secs,
        window_count: config.reputation_multiplier,
        track_utilization: config.track_utilization,
    };

    let mut aggregator = ChannelMetricsAggregator::new(params, channel_info);
    for fwd in time_ordered(forwards).iter() {
        aggregator.process_forward(fwd)?;
    }

    let scores = aggregator.snapshot(as_of)?;
    tracing::info!(
        forwards = forwards.len(),
        channels = scores.len(),
        as_of,
        "Computed channel scores"
    );
    Ok(scores)
}
