//! Per-channel reputation, revenue and decaying utilization.

use super::{DecayingAccumulator, MetricsError, WindowedAverage};
use crate::domain::{ChannelId, ChannelInfo, ForwardEvent};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Parameters shared by every channel's metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorParams {
    /// Start of the revenue averaging horizon (seconds since epoch).
    pub start_ts: f64,
    /// Base window duration in seconds.
    pub window_secs: f64,
    /// Number of windows in the reputation/revenue horizon.
    pub window_count: u32,
    /// Track liquidity and slot utilization alongside reputation and revenue.
    pub track_utilization: bool,
}

impl AggregatorParams {
    /// Period of the reputation accumulator: `window_secs * window_count`.
    pub fn reputation_period(&self) -> f64 {
        self.window_secs * f64::from(self.window_count)
    }
}

/// Metrics tracked for a single channel.
#[derive(Debug, Clone)]
pub struct ChannelMetrics {
    /// Fees earned while this channel was the outgoing link.
    pub reputation: DecayingAccumulator,
    /// Fees earned while this channel was the incoming link.
    pub revenue: WindowedAverage,
    /// Decayed fraction of capacity used; None unless capacity is known.
    pub liquidity_utilization: Option<DecayingAccumulator>,
    /// Decayed count of HTLCs carried.
    pub slot_utilization: Option<DecayingAccumulator>,
}

impl ChannelMetrics {
    fn new(params: &AggregatorParams, capacity_known: bool) -> Self {
        let period = params.reputation_period();
        Self {
            reputation: DecayingAccumulator::new(period),
            revenue: WindowedAverage::new(params.start_ts, params.window_secs, params.window_count),
            liquidity_utilization: (params.track_utilization && capacity_known)
                .then(|| DecayingAccumulator::new(period)),
            slot_utilization: params
                .track_utilization
                .then(|| DecayingAccumulator::new(period)),
        }
    }

    fn credit_utilization(
        &mut self,
        amount_msat: u64,
        info: Option<&ChannelInfo>,
        now: f64,
    ) -> Result<(), MetricsError> {
        if let Some(slots) = self.slot_utilization.as_mut() {
            slots.add_value(1.0, now)?;
        }
        if let (Some(liquidity), Some(info)) = (self.liquidity_utilization.as_mut(), info) {
            let capacity = info.capacity_msat();
            if capacity > 0 {
                liquidity.add_value(amount_msat as f64 / capacity as f64, now)?;
            }
        }
        Ok(())
    }
}

/// A channel's metrics read at a single timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelScore {
    pub channel_id: ChannelId,
    pub reputation: i64,
    pub revenue: i64,
    pub liquidity_utilization: Option<f64>,
    pub slot_utilization: Option<f64>,
}

/// Routes forwards to lazily created per-channel metrics.
#[derive(Debug)]
pub struct ChannelMetricsAggregator<'a> {
    params: AggregatorParams,
    channel_info: &'a HashMap<ChannelId, ChannelInfo>,
    channels: BTreeMap<ChannelId, ChannelMetrics>,
}

impl<'a> ChannelMetricsAggregator<'a> {
    pub fn new(params: AggregatorParams, channel_info: &'a HashMap<ChannelId, ChannelInfo>) -> Self {
        Self {
            params,
            channel_info,
            channels: BTreeMap::new(),
        }
    }

    /// Credit one forward: reputation to the outgoing link, revenue to the incoming link.
    pub fn process_forward(&mut self, fwd: &ForwardEvent) -> Result<(), MetricsError> {
        let now = fwd.time_secs();
        let fee = fwd.fee_msat as f64;
        let channel_info = self.channel_info;

        if let Some(chan_out) = &fwd.chan_id_out {
            let info = channel_info.get(chan_out);
            let metrics = self.metrics_mut(chan_out);
            metrics.reputation.add_value(fee, now)?;
            metrics.credit_utilization(fwd.amt_out_msat, info, now)?;
        }

        if let Some(chan_in) = &fwd.chan_id_in {
            let info = channel_info.get(chan_in);
            let metrics = self.metrics_mut(chan_in);
            metrics.revenue.add_value(fee, now)?;
            metrics.credit_utilization(fwd.amt_in_msat, info, now)?;
        }

        Ok(())
    }

    fn metrics_mut(&mut self, channel_id: &ChannelId) -> &mut ChannelMetrics {
        let capacity_known = self.channel_info.contains_key(channel_id);
        let params = &self.params;
        self.channels
            .entry(channel_id.clone())
            .or_insert_with(|| ChannelMetrics::new(params, capacity_known))
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Read every channel at `now`, in sorted channel id order.
    pub fn snapshot(&mut self, now: f64) -> Result<Vec<ChannelScore>, MetricsError> {
        let mut scores = Vec::with_capacity(self.channels.len());
        for (channel_id, metrics) in self.channels.iter_mut() {
            let reputation = metrics.reputation.value_at(now)?;
            let revenue = metrics.revenue.value_at(now)?;
            let liquidity_utilization = metrics
                .liquidity_utilization
                .as_mut()
                .map(|acc| acc.value_at(now))
                .transpose()?;
            let slot_utilization = metrics
                .slot_utilization
                .as_mut()
                .map(|acc| acc.value_at(now))
                .transpose()?;

            scores.push(ChannelScore {
                channel_id: channel_id.clone(),
                reputation: reputation.round() as i64,
                revenue: revenue.round() as i64,
                liquidity_utilization,
                slot_utilization,
            });
        }
        Ok(scores)
    }
}
