//! Reconstruction of per-channel occupancy over time, reduced to histograms.

use super::time_ordered;
use crate::config::Config;
use crate::datasource::ChannelInfoMap;
use crate::domain::{ChannelId, ChannelInfo, ForwardEvent};
use crate::engine::{
    liquidity_bucket, slot_bucket, BucketTimes, Direction, OccupancySimulator, StateTimeline,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated time-in-bucket across all incoming channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationSummary {
    pub channels_analyzed: usize,
    /// Incoming channels with no capacity info (excluded from the liquidity histogram).
    pub channels_without_capacity: usize,
    pub forwards_processed: usize,
    pub resolution_delay_secs: f64,
    pub slot_times: BucketTimes,
    pub liquidity_times: BucketTimes,
}

struct ChannelTimelines<'a> {
    info: Option<&'a ChannelInfo>,
    slots: StateTimeline<u32>,
    liquidity: Option<StateTimeline<f64>>,
}

impl<'a> ChannelTimelines<'a> {
    fn new(start: f64, info: Option<&'a ChannelInfo>) -> Self {
        Self {
            info,
            slots: StateTimeline::new(0, start),
            liquidity: info.map(|_| StateTimeline::new(0.0, start)),
        }
    }
}

/// Record the channel's current totals into its timelines at `timestamp`.
fn record_state(
    timelines: &mut BTreeMap<ChannelId, ChannelTimelines<'_>>,
    simulator: &OccupancySimulator,
    channel_id: &ChannelId,
    timestamp: f64,
) {
    let Some(track) = timelines.get_mut(channel_id) else {
        return;
    };
    let occupancy = simulator.occupancy(channel_id);
    track.slots.record(timestamp, occupancy.total_slots());
    if let (Some(liquidity), Some(info)) = (track.liquidity.as_mut(), track.info) {
        liquidity.record(
            timestamp,
            info.liquidity_percent(occupancy.total_liquidity_msat()),
        );
    }
}

/// Release every HTLC due by `now`, recording each channel's state at its release time.
fn drain_resolutions(
    timelines: &mut BTreeMap<ChannelId, ChannelTimelines<'_>>,
    simulator: &mut OccupancySimulator,
    now: f64,
) {
    while let Some(resolved) = simulator.resolve_next(now) {
        record_state(
            timelines,
            simulator,
            &resolved.channel_id,
            resolved.resolution_time,
        );
    }
}

/// Replay forwards through an occupancy simulator where every incoming HTLC is held
/// for `config.htlc_resolution_secs`, then bucket the time each channel spent at each
/// slot count and liquidity percentage.
pub fn analyze_utilization(
    forwards: &[ForwardEvent],
    channel_info: &ChannelInfoMap,
    config: &Config,
) -> UtilizationSummary {
    let delay = config.htlc_resolution_secs;
    let mut summary = UtilizationSummary {
        channels_analyzed: 0,
        channels_without_capacity: 0,
        forwards_processed: forwards.len(),
        resolution_delay_secs: delay,
        slot_times: BucketTimes::zeroed(&config.slot_buckets),
        liquidity_times: BucketTimes::zeroed(&config.liquidity_buckets),
    };

    let forwards = time_ordered(forwards);
    let (Some(first), Some(last)) = (forwards.first(), forwards.last()) else {
        tracing::info!("No forwards to analyze");
        return summary;
    };
    let start = first.time_secs();
    let final_time = last.time_secs() + delay * 2.0;

    let mut simulator = OccupancySimulator::new(delay);
    let mut timelines: BTreeMap<ChannelId, ChannelTimelines<'_>> = BTreeMap::new();

    for fwd in forwards.iter() {
        let now = fwd.time_secs();

        drain_resolutions(&mut timelines, &mut simulator, now);

        let Some(chan_in) = &fwd.chan_id_in else {
            continue;
        };
        timelines
            .entry(chan_in.clone())
            .or_insert_with(|| ChannelTimelines::new(start, channel_info.get(chan_in)));
        simulator.add(now, chan_in, fwd.amt_in_msat, Direction::Incoming);
        record_state(&mut timelines, &simulator, chan_in, now);
    }

    drain_resolutions(&mut timelines, &mut simulator, final_time);

    for (channel_id, track) in &timelines {
        let slot_times = track
            .slots
            .reduce(final_time, &config.slot_buckets, slot_bucket);
        summary.slot_times.merge(&slot_times);

        match &track.liquidity {
            Some(liquidity) => {
                let liquidity_times =
                    liquidity.reduce(final_time, &config.liquidity_buckets, liquidity_bucket);
                summary.liquidity_times.merge(&liquidity_times);
            }
            None => {
                tracing::debug!(channel = %channel_id, "No capacity info; skipping liquidity");
                summary.channels_without_capacity += 1;
            }
        }
    }
    summary.channels_analyzed = timelines.len();

    tracing::info!(
        channels = summary.channels_analyzed,
        without_capacity = summary.channels_without_capacity,
        observed_secs = summary.slot_times.total,
        "Computed utilization distribution"
    );
    summary
}
