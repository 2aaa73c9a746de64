//! Sequence continuity analysis.
//!
//! Computes, for one volume or segment, the missing numbers within the
//! observed range, duplicate numbers with counts, and ordering anomalies
//! relative to the encounter order. Range completeness is checked against
//! the observed `[start, end]` span, never against the expected start: a
//! gap-free sequence starting at 5 is complete with a start-offset anomaly,
//! not missing 1 through 4.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Expected first chapter number within a volume or segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetMode {
    /// Each volume restarts at 1.
    #[serde(rename = "reset_1")]
    ResetToOne,
    /// Each volume restarts at 0.
    #[serde(rename = "reset_0")]
    ResetToZero,
    /// Numbering continues across volumes; the first volume expects 1.
    #[serde(rename = "continuous")]
    Continuous,
}

/// An ordering anomaly between two adjacent entries in encounter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAnomaly {
    /// A forward jump over one or more numbers.
    Skip { from: u32, to: u32, gap: u32 },
    /// The number went backwards.
    Regression { from: u32, to: u32 },
}

impl fmt::Display for OrderAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderAnomaly::Skip { from, to, gap } => {
                write!(f, "{from} -> {to} (skipped {gap})")
            }
            OrderAnomaly::Regression { from, to } => {
                write!(f, "{from} -> {to} (regression)")
            }
        }
    }
}

/// Continuity report for one volume or segment. Derived and read-only;
/// recomputed on every check.
#[derive(Debug, Clone)]
pub struct SequenceReport {
    pub label: String,
    /// Derived from the [`ResetMode`]; `None` when continuous with no
    /// previous segment end.
    pub expected_start: Option<u32>,
    pub start: u32,
    pub end: u32,
    /// Numbers absent from the `[start, end]` range, ascending.
    pub missing: Vec<u32>,
    /// Numbers occurring more than once in the raw input, with counts.
    pub duplicates: Vec<(u32, usize)>,
    /// Anomalies in encounter order.
    pub anomalies: Vec<OrderAnomaly>,
}

impl SequenceReport {
    /// `(actual, expected)` when the sequence does not start where the
    /// reset mode says it should.
    pub fn start_offset(&self) -> Option<(u32, u32)> {
        match self.expected_start {
            Some(expected) if expected != self.start => Some((self.start, expected)),
            _ => None,
        }
    }

    /// Whether the observed range has no internal gaps.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Analyze one sequence of chapter numbers.
///
/// `numbers` is the raw, non-deduplicated input; duplicates are counted on
/// it. `original_order` is the encounter order used for the anomaly pass
/// (`None` skips that pass). Returns `None` for empty input.
pub fn analyze(
    label: &str,
    numbers: &[u32],
    mode: ResetMode,
    prev_end: Option<u32>,
    original_order: Option<&[u32]>,
) -> Option<SequenceReport> {
    if numbers.is_empty() {
        return None;
    }

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for &n in numbers {
        *counts.entry(n).or_insert(0) += 1;
    }
    let start = *counts.keys().next()?;
    let end = *counts.keys().next_back()?;

    let expected_start = match mode {
        ResetMode::ResetToOne => Some(1),
        ResetMode::ResetToZero => Some(0),
        ResetMode::Continuous => prev_end.map(|e| e + 1),
    };

    let missing: Vec<u32> = (start..=end).filter(|n| !counts.contains_key(n)).collect();

    let duplicates: Vec<(u32, usize)> = counts
        .iter()
        .filter(|&(_, &count)| count > 1)
        .map(|(&n, &count)| (n, count))
        .collect();

    let mut anomalies = Vec::new();
    if let Some(order) = original_order {
        for pair in order.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if to > from && to - from > 1 {
                anomalies.push(OrderAnomaly::Skip {
                    from,
                    to,
                    gap: to - from - 1,
                });
            } else if to < from {
                anomalies.push(OrderAnomaly::Regression { from, to });
            }
        }
    }

    Some(SequenceReport {
        label: label.to_string(),
        expected_start,
        start,
        end,
        missing,
        duplicates,
        anomalies,
    })
}
