//! Channel score CSV output.

use super::ReportError;
use crate::config::ChannelIdMode;
use crate::domain::ChannelId;
use crate::engine::ChannelScore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Maps channel ids to the label written in reports.
#[derive(Debug, Clone)]
pub struct ChannelLabeler {
    mode: ChannelIdMode,
    sequential: HashMap<ChannelId, usize>,
}

impl ChannelLabeler {
    /// Sequential labels are assigned 1..n over the sorted ids.
    pub fn new<'a>(mode: ChannelIdMode, ids: impl IntoIterator<Item = &'a ChannelId>) -> Self {
        let sequential = if mode == ChannelIdMode::Sequential {
            let mut sorted: Vec<&ChannelId> = ids.into_iter().collect();
            sorted.sort();
            sorted.dedup();
            sorted
                .into_iter()
                .enumerate()
                .map(|(i, id)| (id.clone(), i + 1))
                .collect()
        } else {
            HashMap::new()
        };
        Self { mode, sequential }
    }

    pub fn label(&self, id: &ChannelId) -> String {
        match self.mode {
            ChannelIdMode::Raw => id.to_string(),
            ChannelIdMode::Sequential => self
                .sequential
                .get(id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| id.to_string()),
            ChannelIdMode::Hashed => {
                let digest = Sha256::digest(id.as_str().as_bytes());
                hex::encode(&digest[..8])
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoreWriteOptions {
    pub mode: ChannelIdMode,
    /// Snapshot time column value; set for repeated runs appending to one file.
    pub timestamp: Option<String>,
    /// Append to an existing file instead of truncating it.
    pub append: bool,
}

fn header(scores: &[ChannelScore], with_timestamp: bool) -> Vec<&'static str> {
    let mut header = Vec::new();
    if with_timestamp {
        header.push("timestamp");
    }
    header.extend(["channel_id", "reputation", "revenue"]);
    if scores.iter().any(|s| s.liquidity_utilization.is_some()) {
        header.push("liquidity_utilization");
    }
    if scores.iter().any(|s| s.slot_utilization.is_some()) {
        header.push("slot_utilization");
    }
    header
}

/// Write scores as CSV rows to `writer`, optionally preceded by a header.
pub fn write_scores_to<W: Write>(
    writer: W,
    scores: &[ChannelScore],
    options: &ScoreWriteOptions,
    write_header: bool,
) -> Result<(), ReportError> {
    let labeler = ChannelLabeler::new(options.mode, scores.iter().map(|s| &s.channel_id));
    let with_liquidity = scores.iter().any(|s| s.liquidity_utilization.is_some());
    let with_slots = scores.iter().any(|s| s.slot_utilization.is_some());

    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    if write_header {
        csv.write_record(header(scores, options.timestamp.is_some()))?;
    }

    for score in scores {
        let mut row = Vec::with_capacity(6);
        if let Some(ts) = &options.timestamp {
            row.push(ts.clone());
        }
        row.push(labeler.label(&score.channel_id));
        row.push(score.reputation.to_string());
        row.push(score.revenue.to_string());
        if with_liquidity {
            row.push(
                score
                    .liquidity_utilization
                    .map(|v| format!("{:.6}", v))
                    .unwrap_or_default(),
            );
        }
        if with_slots {
            row.push(
                score
                    .slot_utilization
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_default(),
            );
        }
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write scores to `path`. In append mode the header is only written to an empty file.
pub fn write_scores(
    path: &Path,
    scores: &[ChannelScore],
    options: &ScoreWriteOptions,
) -> Result<(), ReportError> {
    let existing_len = if options.append {
        std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    } else {
        0
    };

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(options.append)
        .truncate(!options.append)
        .open(path)?;

    write_scores_to(file, scores, options, existing_len == 0)?;
    tracing::info!(path = %path.display(), channels = scores.len(), "Wrote channel scores");
    Ok(())
}
