//! Discrete-event simulation of in-flight HTLC slots and liquidity per channel.

use crate::domain::ChannelId;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

/// Which side of the channel holds the HTLC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// An HTLC scheduled to resolve at `resolution_time`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingResolution {
    pub resolution_time: f64,
    pub amount_msat: u64,
    pub channel_id: ChannelId,
    pub direction: Direction,
}

impl Eq for PendingResolution {}

impl Ord for PendingResolution {
    fn cmp(&self, other: &Self) -> Ordering {
        self.resolution_time
            .total_cmp(&other.resolution_time)
            .then_with(|| self.amount_msat.cmp(&other.amount_msat))
            .then_with(|| self.channel_id.cmp(&other.channel_id))
            .then_with(|| self.direction.cmp(&other.direction))
    }
}

impl PartialOrd for PendingResolution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Live in-flight counters for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelOccupancy {
    pub slots_in: u32,
    pub slots_out: u32,
    pub liquidity_in_msat: u64,
    pub liquidity_out_msat: u64,
}

impl ChannelOccupancy {
    pub fn total_slots(&self) -> u32 {
        self.slots_in + self.slots_out
    }

    pub fn total_liquidity_msat(&self) -> u64 {
        self.liquidity_in_msat + self.liquidity_out_msat
    }

    fn apply_add(&mut self, amount_msat: u64, direction: Direction) {
        match direction {
            Direction::Incoming => {
                self.slots_in += 1;
                self.liquidity_in_msat += amount_msat;
            }
            Direction::Outgoing => {
                self.slots_out += 1;
                self.liquidity_out_msat += amount_msat;
            }
        }
    }

    fn apply_resolve(&mut self, amount_msat: u64, direction: Direction) {
        match direction {
            Direction::Incoming => {
                self.slots_in = self.slots_in.saturating_sub(1);
                self.liquidity_in_msat = self.liquidity_in_msat.saturating_sub(amount_msat);
            }
            Direction::Outgoing => {
                self.slots_out = self.slots_out.saturating_sub(1);
                self.liquidity_out_msat = self.liquidity_out_msat.saturating_sub(amount_msat);
            }
        }
    }
}

/// Holds HTLCs for a fixed delay after they are added, then releases them in
/// resolution-time order.
#[derive(Debug)]
pub struct OccupancySimulator {
    resolution_delay: f64,
    pending: BinaryHeap<Reverse<PendingResolution>>,
    occupancy: HashMap<ChannelId, ChannelOccupancy>,
}

impl OccupancySimulator {
    pub fn new(resolution_delay: f64) -> Self {
        Self {
            resolution_delay,
            pending: BinaryHeap::new(),
            occupancy: HashMap::new(),
        }
    }

    /// Occupy a slot and `amount_msat` on `channel_id` until `now + resolution_delay`.
    pub fn add(&mut self, now: f64, channel_id: &ChannelId, amount_msat: u64, direction: Direction) {
        self.pending.push(Reverse(PendingResolution {
            resolution_time: now + self.resolution_delay,
            amount_msat,
            channel_id: channel_id.clone(),
            direction,
        }));
        self.occupancy
            .entry(channel_id.clone())
            .or_default()
            .apply_add(amount_msat, direction);
    }

    /// Release the earliest HTLC due at or before `now`, if any.
    ///
    /// Counters reflect only this release when the call returns, so callers can
    /// observe each intermediate state.
    pub fn resolve_next(&mut self, now: f64) -> Option<PendingResolution> {
        if !self
            .pending
            .peek()
            .is_some_and(|Reverse(next)| next.resolution_time <= now)
        {
            return None;
        }
        let Reverse(resolution) = self.pending.pop()?;
        self.occupancy
            .entry(resolution.channel_id.clone())
            .or_default()
            .apply_resolve(resolution.amount_msat, resolution.direction);
        Some(resolution)
    }

    /// Release every HTLC due at or before `now`, earliest first.
    pub fn resolve(&mut self, now: f64) -> Vec<PendingResolution> {
        std::iter::from_fn(|| self.resolve_next(now)).collect()
    }

    /// Current counters for `channel_id` (all zero if never seen).
    pub fn occupancy(&self, channel_id: &ChannelId) -> ChannelOccupancy {
        self.occupancy.get(channel_id).copied().unwrap_or_default()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
