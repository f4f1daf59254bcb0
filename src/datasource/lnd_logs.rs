//! Extraction of HTLC add/resolve events from LND log files.

use super::{read_input_bytes, IngestError};
use crate::domain::{HtlcAdd, HtlcResolve, Outcome};
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn add_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d+).*?Sending UpdateAddHTLC.*?id=(\d+).*?hash=([0-9a-f]+)",
        )
        .expect("valid add pattern")
    })
}

fn resolve_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d+).*?Closed completed (SETTLE|FAIL) circuit for ([0-9a-f]+):.*?<-> \([^,]+, (\d+)\)",
        )
        .expect("valid resolve pattern")
    })
}

/// Parse a log timestamp (`YYYY-MM-DD HH:MM:SS.fff`, UTC) into seconds since epoch.
pub fn parse_log_timestamp(s: &str) -> Option<f64> {
    let dt = NaiveDateTime::parse_from_str(s, LOG_TIMESTAMP_FORMAT).ok()?;
    let utc = dt.and_utc();
    Some(utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9)
}

/// `lnd.log*` files in `dir`, sorted by name.
pub fn find_log_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::MissingLogDir(dir.to_path_buf()));
    }
    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("lnd.log"))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(IngestError::NoLogFiles(dir.to_path_buf()));
    }
    Ok(files)
}

/// Read and concatenate the lines of every log file, in the given order.
///
/// Rotated `.gz` archives and `.lz4` files are decompressed.
pub fn read_log_lines(files: &[PathBuf]) -> Result<Vec<String>, IngestError> {
    let mut lines = Vec::new();
    for path in files {
        let bytes = read_input_bytes(path)?;
        let before = lines.len();
        lines.extend(String::from_utf8_lossy(&bytes).lines().map(str::to_owned));
        tracing::debug!(file = %path.display(), lines = lines.len() - before, "Read log file");
    }
    Ok(lines)
}

pub fn extract_add_events<S: AsRef<str>>(lines: &[S]) -> Vec<HtlcAdd> {
    lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| line.contains("Sending UpdateAddHTLC"))
        .filter_map(|line| {
            let caps = add_pattern().captures(line)?;
            Some(HtlcAdd {
                timestamp: parse_log_timestamp(&caps[1])?,
                htlc_id: caps[2].parse().ok()?,
                payment_hash: caps[3].to_string(),
            })
        })
        .collect()
}

pub fn extract_resolve_events<S: AsRef<str>>(lines: &[S]) -> Vec<HtlcResolve> {
    lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| line.contains("Closed completed") && line.contains("circuit"))
        .filter_map(|line| {
            let caps = resolve_pattern().captures(line)?;
            let outcome = match &caps[2] {
                "SETTLE" => Outcome::Settle,
                _ => Outcome::Fail,
            };
            Some(HtlcResolve {
                timestamp: parse_log_timestamp(&caps[1])?,
                outcome,
                payment_hash: caps[3].to_string(),
                htlc_id: caps[4].parse().ok()?,
            })
        })
        .collect()
}
