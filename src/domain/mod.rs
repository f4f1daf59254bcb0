//! Domain types for forwarding-history analysis.
//!
//! This module provides:
//! - Domain primitives: TimestampNs, ChannelId
//! - Forward and channel-info records consumed by the engines
//! - HTLC add/resolve events extracted from node logs
//! - Stable forward ordering helper for deterministic processing

pub mod channel_info;
pub mod forward;
pub mod htlc;
pub mod ordering;
pub mod primitives;

pub use channel_info::ChannelInfo;
pub use forward::ForwardEvent;
pub use htlc::{HtlcAdd, HtlcResolve, Outcome};
pub use ordering::{is_time_ordered, sort_forwards_by_time};
pub use primitives::{ChannelId, TimestampNs};
