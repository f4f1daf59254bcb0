//! File-to-file jobs behind each command: read inputs, run a pipeline, write the report.

use crate::config::Config;
use crate::datasource::{read_channel_info, read_forwards, ChannelInfoMap};
use crate::engine::{ChannelScore, ResolutionStats};
use crate::error::AppError;
use crate::pipeline::{analyze_log_dir, analyze_utilization, compute_scores};
use crate::report::{
    render_resolution_text, write_scores, ReportError, ScoreWriteOptions, UtilizationReport,
};
use std::path::Path;

/// Rendering of the utilization report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Score `input` as of `as_of` and write the snapshot to `output`.
///
/// Without a channel info file every channel is scored without capacity.
pub fn score_files(
    input: &Path,
    channel_info: Option<&Path>,
    output: &Path,
    config: &Config,
    as_of: f64,
    options: &ScoreWriteOptions,
) -> Result<Vec<ChannelScore>, AppError> {
    let info = match channel_info {
        Some(path) => read_channel_info(path)?,
        None => ChannelInfoMap::new(),
    };
    let forwards = read_forwards(input)?;
    let scores = compute_scores(&forwards, &info, config, as_of)?;
    write_scores(output, &scores, options)?;
    Ok(scores)
}

/// Build the utilization distribution for `input` and write it to `output`.
pub fn utilization_files(
    input: &Path,
    channel_info: &Path,
    output: &Path,
    config: &Config,
    resolution_secs: Option<f64>,
    format: ReportFormat,
) -> Result<UtilizationReport, AppError> {
    let config = match resolution_secs {
        Some(secs) => config.clone().with_htlc_resolution_secs(secs)?,
        None => config.clone(),
    };

    let info = read_channel_info(channel_info)?;
    let forwards = read_forwards(input)?;
    let summary = analyze_utilization(&forwards, &info, &config);
    let report = UtilizationReport::new(&summary, &config);
    let body = match format {
        ReportFormat::Text => report.render_text(),
        ReportFormat::Json => report.to_json()?,
    };
    std::fs::write(output, body).map_err(ReportError::from)?;
    tracing::info!(path = %output.display(), "Wrote utilization report");
    Ok(report)
}

/// Compute resolution-time statistics for the logs in `logs_dir` and write the report.
pub fn resolution_files(logs_dir: &Path, output: &Path) -> Result<ResolutionStats, AppError> {
    let stats = analyze_log_dir(logs_dir)?;
    std::fs::write(output, render_resolution_text(&stats)).map_err(ReportError::from)?;
    tracing::info!(path = %output.display(), "Wrote resolution report");
    Ok(stats)
}
