//! Pure computation engines for continuous-time channel metrics.
//!
//! Nothing here performs I/O. Callers supply forwards sorted by timestamp.

use thiserror::Error;

pub mod aggregator;
pub mod buckets;
pub mod decay;
pub mod occupancy;
pub mod resolution;
pub mod timeline;
pub mod windowed;

pub use aggregator::{AggregatorParams, ChannelMetrics, ChannelMetricsAggregator, ChannelScore};
pub use buckets::{
    liquidity_bucket, liquidity_label, slot_bucket, slot_label, Bucket, BucketSet,
    LIQUIDITY_EPSILON_PERCENT,
};
pub use decay::{DecayingAccumulator, CAUSALITY_TOLERANCE_SECS};
pub use occupancy::{ChannelOccupancy, Direction, OccupancySimulator, PendingResolution};
pub use resolution::{compute_resolution_stats, ResolutionStats, RESOLUTION_BUCKET_COUNT};
pub use timeline::{BucketTimes, StateTimeline};
pub use windowed::WindowedAverage;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("update at {attempted} is earlier than last update at {last_update}")]
    CausalityViolation { last_update: f64, attempted: f64 },
    #[error("invalid bucket thresholds: {0}")]
    InvalidBuckets(String),
}
