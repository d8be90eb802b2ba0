//! Per-partition quality summaries, written alongside every cleaned table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::EnrichedStopEvent;

/// Distribution summary of the non-null delays in a partition. Every field
/// is null when the partition has no delay values at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub p50: Option<f64>,
    pub p95: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub dataset: String,
    pub rows_before: u64,
    pub rows_after: u64,
    pub dropped_rows: u64,
    pub nulls_after: BTreeMap<String, u64>,
    pub delay_seconds_stats: DelayStats,
}

/// Summarizes one partition against the raw day table it came from.
/// `rows_before` is the raw row count, so `dropped_rows` counts everything
/// lost to filtering, splitting, and the other partition combined.
pub fn quality_report(
    rows_before: usize,
    partition: &[EnrichedStopEvent],
    dataset: &str,
) -> QualityReport {
    let delays: Vec<f64> = partition.iter().filter_map(|r| r.delay_seconds).collect();

    QualityReport {
        dataset: dataset.to_string(),
        rows_before: rows_before as u64,
        rows_after: partition.len() as u64,
        dropped_rows: rows_before.saturating_sub(partition.len()) as u64,
        nulls_after: EnrichedStopEvent::null_counts(partition),
        delay_seconds_stats: delay_stats(&delays),
    }
}

fn delay_stats(delays: &[f64]) -> DelayStats {
    if delays.is_empty() {
        return DelayStats {
            min: None,
            max: None,
            mean: None,
            p50: None,
            p95: None,
        };
    }

    let mut sorted = delays.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mean = delays.iter().sum::<f64>() / delays.len() as f64;

    DelayStats {
        min: Some(sorted[0]),
        max: Some(sorted[sorted.len() - 1]),
        mean: Some(mean),
        p50: Some(quantile(&sorted, 0.5)),
        p95: Some(quantile(&sorted, 0.95)),
    }
}

/// Linearly interpolated quantile over an ascending-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
