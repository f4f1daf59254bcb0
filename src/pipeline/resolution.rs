//! HTLC resolution-time statistics over a directory of LND logs.

use crate::datasource::{
    extract_add_events, extract_resolve_events, find_log_files, read_log_lines, IngestError,
};
use crate::engine::{compute_resolution_stats, ResolutionStats};
use std::path::Path;

pub fn analyze_log_dir(dir: &Path) -> Result<ResolutionStats, IngestError> {
    let files = find_log_files(dir)?;
    for file in &files {
        tracing::info!(file = %file.display(), "Found log file");
    }

    let lines = read_log_lines(&files)?;
    let adds = extract_add_events(&lines);
    let resolves = extract_resolve_events(&lines);
    tracing::info!(
        lines = lines.len(),
        adds = adds.len(),
        resolves = resolves.len(),
        "Extracted HTLC events"
    );

    Ok(compute_resolution_stats(&adds, &resolves))
}
