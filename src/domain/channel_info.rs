//! Static channel information (capacity and slot limit).

use crate::domain::ChannelId;
use serde::{Deserialize, Serialize};

/// Capacity and HTLC slot limit of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub short_channel_id: ChannelId,
    /// Capacity in satoshis.
    pub capacity_sat: u64,
    pub max_accepted_htlcs: u32,
}

impl ChannelInfo {
    pub fn new(short_channel_id: ChannelId, capacity_sat: u64, max_accepted_htlcs: u32) -> Self {
        Self {
            short_channel_id,
            capacity_sat,
            max_accepted_htlcs,
        }
    }

    /// Capacity in millisatoshis.
    pub fn capacity_msat(&self) -> u64 {
        self.capacity_sat.saturating_mul(1000)
    }

    /// Percentage of capacity represented by `amount_msat`; 0 for a zero-capacity channel.
    pub fn liquidity_percent(&self, amount_msat: u64) -> f64 {
        let capacity = self.capacity_msat();
        if capacity == 0 {
            return 0.0;
        }
        amount_msat as f64 / capacity as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquidity_percent() {
        let info = ChannelInfo::new(ChannelId::from("1x1x1"), 1_000_000, 483);
        assert!((info.liquidity_percent(10_000_000) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_capacity_is_zero_percent() {
        let info = ChannelInfo::new(ChannelId::from("1x1x1"), 0, 483);
        assert_eq!(info.liquidity_percent(5_000), 0.0);
    }
}
