//! HTLC resolution-time distribution report.

use crate::domain::Outcome;
use crate::engine::resolution::resolution_bucket_labels;
use crate::engine::ResolutionStats;

fn percentage(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    value as f64 * 100.0 / total as f64
}

/// Small shares keep two decimals so they do not print as 0.0.
fn share(pct: f64) -> String {
    if pct >= 0.1 {
        format!("{:.1}", pct)
    } else {
        format!("{:.2}", pct)
    }
}

pub fn render_resolution_text(stats: &ResolutionStats) -> String {
    let total = stats.total();
    let mut lines = vec![
        "HTLC Resolution Time Distribution".to_string(),
        "==================================".to_string(),
        String::new(),
        format!("Total HTLCs analyzed: {}", total),
    ];
    if total > 0 {
        lines.push(format!(
            "  - SETTLE: {} ({}%)",
            stats.settle_total,
            share(percentage(stats.settle_total, total))
        ));
        lines.push(format!(
            "  - FAIL:   {} ({}%)",
            stats.fail_total,
            share(percentage(stats.fail_total, total))
        ));
    }
    lines.push(format!("  - Unmatched resolve events: {}", stats.unmatched));
    lines.push(format!(
        "  - Unresolved HTLCs (still in-flight): {}",
        stats.unresolved
    ));

    for outcome in [Outcome::Settle, Outcome::Fail] {
        let title = format!("{} Distribution:", outcome);
        let outcome_total = stats.outcome_total(outcome);
        let rule = "-".repeat(title.len());
        lines.extend([String::new(), title, rule]);
        lines.push(format!("{:<10} {:>8} {:>8}", "Bucket", "Count", "Percent"));
        lines.extend(
            resolution_bucket_labels()
                .zip(stats.counts(outcome))
                .map(|(label, count)| {
                    format!(
                        "{:<10} {:>8} {:>7.1}%",
                        label,
                        count,
                        percentage(*count, outcome_total)
                    )
                }),
        );
    }

    lines.push(String::new());
    lines.join("\n")
}
