pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod pipeline;
pub mod report;

pub use config::{ChannelIdMode, Config};
pub use datasource::{ChannelInfoMap, IngestError};
pub use domain::{ChannelId, ChannelInfo, ForwardEvent, HtlcAdd, HtlcResolve, Outcome, TimestampNs};
pub use engine::{ChannelScore, MetricsError};
pub use error::AppError;
