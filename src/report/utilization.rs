//! Utilization distribution report (text and JSON).

use super::ReportError;
use crate::config::Config;
use crate::engine::{liquidity_label, slot_label, Bucket, BucketSet, BucketTimes};
use crate::pipeline::UtilizationSummary;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramRow {
    pub label: String,
    pub seconds: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub rows: Vec<HistogramRow>,
    pub total_seconds: f64,
}

impl Histogram {
    fn build(times: &BucketTimes, buckets: &BucketSet, label: fn(Bucket, &BucketSet) -> String) -> Self {
        let rows = buckets
            .buckets()
            .map(|bucket| {
                let seconds = times.get(bucket, buckets);
                let percent = if times.total > 0.0 {
                    seconds / times.total * 100.0
                } else {
                    0.0
                };
                HistogramRow {
                    label: label(bucket, buckets),
                    seconds,
                    percent,
                }
            })
            .collect();
        Self {
            rows,
            total_seconds: times.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationReport {
    pub channels_analyzed: usize,
    pub channels_without_capacity: usize,
    pub forwards_processed: usize,
    pub resolution_delay_secs: f64,
    pub slots: Histogram,
    pub liquidity: Histogram,
}

impl UtilizationReport {
    pub fn new(summary: &UtilizationSummary, config: &Config) -> Self {
        Self {
            channels_analyzed: summary.channels_analyzed,
            channels_without_capacity: summary.channels_without_capacity,
            forwards_processed: summary.forwards_processed,
            resolution_delay_secs: summary.resolution_delay_secs,
            slots: Histogram::build(&summary.slot_times, &config.slot_buckets, slot_label),
            liquidity: Histogram::build(
                &summary.liquidity_times,
                &config.liquidity_buckets,
                liquidity_label,
            ),
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        let total = self.slots.total_seconds;
        let mut lines = vec![
            "Incoming Channel Utilization Distribution".to_string(),
            "==========================================".to_string(),
            String::new(),
            format!("HTLC resolution time: {}s", self.resolution_delay_secs),
            format!("Forwards processed: {}", self.forwards_processed),
            format!("Total incoming channels analyzed: {}", self.channels_analyzed),
            format!(
                "Channels without capacity info: {}",
                self.channels_without_capacity
            ),
            format!(
                "Total observation time: {:.0} seconds ({:.1} hours)",
                total,
                total / 3600.0
            ),
            String::new(),
        ];
        lines.extend(table_lines("Slot Utilization:", "Slots", &self.slots));
        lines.push(String::new());
        lines.extend(table_lines(
            "Liquidity Utilization:",
            "Liquidity",
            &self.liquidity,
        ));
        lines.push(String::new());
        lines.join("\n")
    }
}

fn table_lines(title: &str, column: &str, histogram: &Histogram) -> Vec<String> {
    let mut lines = vec![
        title.to_string(),
        "-".repeat(title.len()),
        format!("{:<15} {:>15} {:>10}", column, "Time (seconds)", "Percent"),
    ];
    lines.extend(histogram.rows.iter().map(|row| {
        format!(
            "{:<15} {:>15.0} {:>9.2}%",
            row.label, row.seconds, row.percent
        )
    }));
    lines
}
