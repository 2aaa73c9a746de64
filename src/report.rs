//! Report rendering.
//!
//! Turns a [`SequenceReport`] into display lines. Long listings are
//! truncated: anomaly detail stops after 10 items and duplicate detail
//! after 5, each with a trailing total; missing numbers group into chunks
//! of 30 labeled by position range once they exceed one chunk.

use crate::sequence::SequenceReport;

const MAX_ANOMALY_LINES: usize = 10;
const MAX_DUPLICATE_LINES: usize = 5;

/// Missing numbers per grouped line.
pub const MISSING_GROUP_SIZE: usize = 30;

/// Render one sequence report as display lines.
pub fn render(report: &SequenceReport) -> Vec<String> {
    let mut lines = vec![report.label.clone()];

    if report.missing.is_empty() {
        match report.start_offset() {
            Some((actual, expected)) => lines.push(format!(
                "  in sequence, but starts at {actual} (expected {expected})"
            )),
            None => lines.push(format!("  complete ({} -> {})", report.start, report.end)),
        }
    } else {
        lines.push(format!("  missing ({}):", report.missing.len()));
        lines.extend(group_missing(&report.missing, MISSING_GROUP_SIZE));
        lines.push(format!("  range: {} -> {}", report.start, report.end));
    }

    if !report.anomalies.is_empty() {
        lines.push(format!("  order anomalies ({}):", report.anomalies.len()));
        for anomaly in report.anomalies.iter().take(MAX_ANOMALY_LINES) {
            lines.push(format!("    {anomaly}"));
        }
        if report.anomalies.len() > MAX_ANOMALY_LINES {
            lines.push(format!("    ... {} total", report.anomalies.len()));
        }
    }

    if !report.duplicates.is_empty() {
        lines.push(format!("  duplicates ({}):", report.duplicates.len()));
        for (number, count) in report.duplicates.iter().take(MAX_DUPLICATE_LINES) {
            lines.push(format!("    chapter {number} appears {count} times"));
        }
        if report.duplicates.len() > MAX_DUPLICATE_LINES {
            lines.push(format!("    ... {} total", report.duplicates.len()));
        }
    }

    lines
}

/// Group missing numbers into display lines.
///
/// At most one line when the total fits in `group_size`; otherwise one line
/// per chunk, labeled with the 1-based position range of its members.
pub fn group_missing(missing: &[u32], group_size: usize) -> Vec<String> {
    if missing.is_empty() || group_size == 0 {
        return Vec::new();
    }

    if missing.len() <= group_size {
        return vec![format!("    {}", join(missing))];
    }

    missing
        .chunks(group_size)
        .enumerate()
        .map(|(i, chunk)| {
            let lo = i * group_size + 1;
            let hi = lo + chunk.len() - 1;
            format!("    [{lo}-{hi}] {}", join(chunk))
        })
        .collect()
}

fn join(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
