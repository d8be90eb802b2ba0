//! Group-ordered time-series features.
//!
//! Every feature here follows the same recipe: collect each group's row
//! indices, walk them in a feature-specific ascending order (nulls last,
//! ties by original position), and write the windowed value back onto the
//! row's original position. Rows whose group key is null belong to no group
//! and keep a null feature. The visible row order never changes.

use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};

use crate::config::CleanConfig;
use crate::model::{EnrichedStopEvent, PeriodOfDay};

/// Adds every group-ordered feature in place, plus the hour-derived period
/// columns. The slice order on entry is the order the caller sees on exit.
pub fn derive_series(rows: &mut [EnrichedStopEvent], cfg: &CleanConfig) {
    let n = rows.len();

    // lagged delays within a trip, ordered by observed arrival
    let trip_groups = group_order(n, |i| rows[i].match_key.as_deref(), |i| rows[i].actual_seconds);
    let lag1 = shifted_column(n, &trip_groups, |i| rows[i].delay_seconds, 1);
    let lag2 = shifted_column(n, &trip_groups, |i| rows[i].delay_seconds, 2);

    // headway between consecutive arrivals at a stop, and its ratio to the
    // previous headway at that stop
    let stop_groups = group_order(n, |i| rows[i].stop_id.as_deref(), |i| rows[i].actual_seconds);
    let headway = diffed_column(n, &stop_groups, |i| rows[i].actual_seconds);
    let prev_headway = shifted_column(n, &stop_groups, |i| headway[i], 1);

    // congestion proxy over recent arrivals of the same route and direction
    let route_groups = group_order(n, |i| route_direction(&rows[i]), |i| rows[i].actual_seconds);
    let route_rolling = trailing_mean_column(
        n,
        &route_groups,
        |i| rows[i].delay_seconds,
        cfg.route_rolling_window,
    );

    // within-trip features ordered by the timetable rather than observation
    let sched_trip_groups =
        group_order(n, |i| rows[i].trip_uid.as_deref(), |i| rows[i].scheduled_seconds);
    let trip_rolling = trailing_mean_column(
        n,
        &sched_trip_groups,
        |i| rows[i].delay_seconds,
        cfg.trip_rolling_window,
    );

    let trip_progress: Vec<Option<f64>> = {
        let spans = trip_spans(rows);
        (0..n)
            .map(|i| {
                let uid = rows[i].trip_uid.as_deref()?;
                let scheduled = rows[i].scheduled_seconds?;
                let (lo, hi) = *spans.get(uid)?;
                let span = hi - lo;
                (span != 0.0).then(|| (scheduled - lo) / span)
            })
            .collect()
    };

    for (i, row) in rows.iter_mut().enumerate() {
        row.lagged_delay_1 = lag1[i];
        row.lagged_delay_2 = lag2[i];
        row.actual_headway_seconds = headway[i];
        row.headway_ratio = match (headway[i], prev_headway[i]) {
            (Some(h), Some(prev)) if prev != 0.0 => Some(h / prev),
            _ => None,
        };
        row.route_rolling_delay = route_rolling[i];
        row.period_of_day = row.hour.map(period_of_day);
        row.is_peak = row.period_of_day.is_some_and(|p| p.is_peak());
        row.trip_progress = trip_progress[i];
        row.rolling_mean_delay_trip = trip_rolling[i];
    }
}

/// Buckets hours into the service periods used downstream.
pub fn period_of_day(hour: u32) -> PeriodOfDay {
    match hour {
        6..=9 => PeriodOfDay::MorningPeak,
        10..=15 => PeriodOfDay::Midday,
        16..=19 => PeriodOfDay::EveningPeak,
        _ => PeriodOfDay::OffPeak,
    }
}

// Direction is the trailing letter of a GTFS stop id ("101N" runs north).
fn route_direction(row: &EnrichedStopEvent) -> Option<(&str, char)> {
    let route = row.route_id.as_deref()?;
    let direction = row.stop_id.as_deref()?.chars().last()?;
    Some((route, direction))
}

/// Original-index lists, one per group, each sorted ascending by `order_key`
/// with nulls last and ties broken by original position.
fn group_order<K: Ord>(
    n: usize,
    group_key: impl Fn(usize) -> Option<K>,
    order_key: impl Fn(usize) -> Option<f64>,
) -> Vec<Vec<usize>> {
    let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for idx in 0..n {
        if let Some(key) = group_key(idx) {
            groups.entry(key).or_default().push(idx);
        }
    }

    groups
        .into_values()
        .map(|mut members| {
            members.sort_by(|&a, &b| match (order_key(a), order_key(b)) {
                (Some(x), Some(y)) => {
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal).then(a.cmp(&b))
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.cmp(&b),
            });
            members
        })
        .collect()
}

/// The value observed `shift` positions earlier in the same group.
fn shifted_column(
    n: usize,
    groups: &[Vec<usize>],
    value: impl Fn(usize) -> Option<f64>,
    shift: usize,
) -> Vec<Option<f64>> {
    let mut out = vec![None; n];
    for members in groups {
        for (pos, &idx) in members.iter().enumerate() {
            if pos >= shift {
                out[idx] = value(members[pos - shift]);
            }
        }
    }
    out
}

/// Difference between a row's value and its predecessor's in group order.
/// Null when either side is null, including the group's first row.
fn diffed_column(
    n: usize,
    groups: &[Vec<usize>],
    value: impl Fn(usize) -> Option<f64>,
) -> Vec<Option<f64>> {
    let mut out = vec![None; n];
    for members in groups {
        for pair in members.windows(2) {
            if let (Some(prev), Some(cur)) = (value(pair[0]), value(pair[1])) {
                out[pair[1]] = Some(cur - prev);
            }
        }
    }
    out
}

/// Trailing mean over up to `window` rows strictly before the current one in
/// group order. A null value occupies a window slot without contributing a
/// sample; at least one sample is required, otherwise the mean is null.
fn trailing_mean_column(
    n: usize,
    groups: &[Vec<usize>],
    value: impl Fn(usize) -> Option<f64>,
    window: usize,
) -> Vec<Option<f64>> {
    let mut out = vec![None; n];
    for members in groups {
        let mut ring: VecDeque<Option<f64>> = VecDeque::with_capacity(window + 1);
        for &idx in members {
            let mut sum = 0.0;
            let mut samples = 0u32;
            for v in ring.iter().flatten() {
                sum += v;
                samples += 1;
            }
            if samples > 0 {
                out[idx] = Some(sum / f64::from(samples));
            }

            ring.push_back(value(idx));
            if ring.len() > window {
                ring.pop_front();
            }
        }
    }
    out
}

// Min and max of the non-null scheduled seconds per trip. Trips where every
// schedule cell is null get no entry.
fn trip_spans(rows: &[EnrichedStopEvent]) -> BTreeMap<&str, (f64, f64)> {
    let mut spans: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for row in rows {
        let (Some(uid), Some(scheduled)) = (row.trip_uid.as_deref(), row.scheduled_seconds) else {
            continue;
        };
        spans
            .entry(uid)
            .and_modify(|(lo, hi)| {
                *lo = lo.min(scheduled);
                *hi = hi.max(scheduled);
            })
            .or_insert((scheduled, scheduled));
    }
    spans
}
