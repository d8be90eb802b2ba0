//! Row-level cleaning: mandatory keys, duplicate collapse, outlier band.
//!
//! Every step preserves the relative order of the rows it keeps.

use std::collections::HashSet;

use crate::model::StopEvent;

/// Drops rows that can neither be grouped nor matched to a stop.
pub fn drop_unkeyed(events: Vec<StopEvent>) -> Vec<StopEvent> {
    events
        .into_iter()
        .filter(|e| e.match_key.is_some() && e.stop_id.is_some())
        .collect()
}

/// Collapses repeated observations of the same stop-event, keeping the first
/// occurrence of each `(match_key, stop_id, actual_seconds)` triple. Two null
/// arrival times count as equal here.
pub fn deduplicate(events: Vec<StopEvent>) -> Vec<StopEvent> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        events
            .iter()
            .map(|e| {
                seen.insert((
                    e.match_key.as_deref(),
                    e.stop_id.as_deref(),
                    seconds_key(e.actual_seconds),
                ))
            })
            .collect()
    };

    events
        .into_iter()
        .zip(keep)
        .filter_map(|(event, keep)| keep.then_some(event))
        .collect()
}

// Coercion never produces NaN, so bit equality is value equality once the
// two zeros are folded together.
fn seconds_key(seconds: Option<f64>) -> Option<u64> {
    seconds.map(|s| if s == 0.0 { 0.0f64.to_bits() } else { s.to_bits() })
}

/// Drops rows whose delay magnitude exceeds `max_abs_delay_seconds`. The band
/// is inclusive, and a null delay cannot be judged an outlier, so it stays.
pub fn filter_delay_outliers(events: Vec<StopEvent>, max_abs_delay_seconds: f64) -> Vec<StopEvent> {
    events
        .into_iter()
        .filter(|e| match e.delay_seconds {
            Some(delay) => (-max_abs_delay_seconds..=max_abs_delay_seconds).contains(&delay),
            None => true,
        })
        .collect()
}
