//! Rendering of computed metrics into output files.

use thiserror::Error;

pub mod resolution;
pub mod scores;
pub mod utilization;

pub use resolution::render_resolution_text;
pub use scores::{write_scores, ChannelLabeler, ScoreWriteOptions};
pub use utilization::{Histogram, HistogramRow, UtilizationReport};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
