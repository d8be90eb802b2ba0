//! Row types flowing through the cleaning pipeline.
//!
//! `Option<T>` is the null sentinel throughout: a null survives coercion and
//! propagates through every derived feature instead of collapsing to zero or
//! NaN.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One coerced stop-event: a train's observed or scheduled presence at one
/// stop, before any feature derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopEvent {
    pub match_key: Option<String>,
    pub trip_uid: Option<String>,
    pub route_id: Option<String>,
    pub stop_id: Option<String>,
    pub is_unscheduled: Option<bool>,
    pub scheduled_seconds: Option<f64>,
    pub actual_seconds: Option<f64>,
    pub delay_seconds: Option<f64>,
    pub delay_minutes: Option<f64>,
}

/// Categorical time-of-day band derived from `hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodOfDay {
    MorningPeak,
    Midday,
    EveningPeak,
    OffPeak,
}

impl PeriodOfDay {
    pub fn is_peak(self) -> bool {
        matches!(self, PeriodOfDay::MorningPeak | PeriodOfDay::EveningPeak)
    }
}

/// A fully enriched stop-event as written to the cleaned partitions.
///
/// The output schema is fixed: when the input carries no `trip_uid` column
/// the trip-scoped features are present but all-null, so downstream readers
/// never see columns appear and disappear between days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedStopEvent {
    // passthrough
    pub match_key: Option<String>,
    pub trip_uid: Option<String>,
    pub route_id: Option<String>,
    pub stop_id: Option<String>,
    pub is_unscheduled: Option<bool>,
    pub scheduled_seconds: Option<f64>,
    pub actual_seconds: Option<f64>,
    pub delay_seconds: Option<f64>,
    pub delay_minutes: Option<f64>,

    // scalar features
    pub service_date: NaiveDate,
    pub hour: Option<u32>,
    pub hour_sin: Option<f64>,
    pub hour_cos: Option<f64>,
    pub dow: u32,
    pub is_weekend: bool,
    pub scheduled_time: Option<String>,
    pub actual_time: Option<String>,

    // time-series features
    pub lagged_delay_1: Option<f64>,
    pub lagged_delay_2: Option<f64>,
    pub actual_headway_seconds: Option<f64>,
    pub headway_ratio: Option<f64>,
    pub route_rolling_delay: Option<f64>,
    pub period_of_day: Option<PeriodOfDay>,
    pub is_peak: bool,
    pub trip_progress: Option<f64>,
    pub rolling_mean_delay_trip: Option<f64>,
}

macro_rules! count_nullable {
    ($rows:expr, $counts:expr, $($field:ident),+ $(,)?) => {
        $(
            $counts.insert(
                stringify!($field).to_string(),
                $rows.iter().filter(|r| r.$field.is_none()).count() as u64,
            );
        )+
    };
}

macro_rules! count_total {
    ($counts:expr, $($field:ident),+ $(,)?) => {
        $(
            $counts.insert(stringify!($field).to_string(), 0u64);
        )+
    };
}

impl EnrichedStopEvent {
    /// Per-column null counts over a partition, covering every output column.
    /// BTreeMap keeps the key order deterministic so serialized reports are
    /// byte-identical across runs.
    pub fn null_counts(rows: &[EnrichedStopEvent]) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        count_nullable!(
            rows,
            counts,
            match_key,
            trip_uid,
            route_id,
            stop_id,
            is_unscheduled,
            scheduled_seconds,
            actual_seconds,
            delay_seconds,
            delay_minutes,
            hour,
            hour_sin,
            hour_cos,
            scheduled_time,
            actual_time,
            lagged_delay_1,
            lagged_delay_2,
            actual_headway_seconds,
            headway_ratio,
            route_rolling_delay,
            period_of_day,
            trip_progress,
            rolling_mean_delay_trip,
        );
        // Columns that cannot hold a null by construction.
        count_total!(counts, service_date, dow, is_weekend, is_peak);
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(service_date: NaiveDate) -> EnrichedStopEvent {
        EnrichedStopEvent {
            match_key: Some("t1".to_string()),
            trip_uid: None,
            route_id: None,
            stop_id: Some("101N".to_string()),
            is_unscheduled: Some(false),
            scheduled_seconds: None,
            actual_seconds: None,
            delay_seconds: None,
            delay_minutes: None,
            service_date,
            hour: None,
            hour_sin: None,
            hour_cos: None,
            dow: 0,
            is_weekend: false,
            scheduled_time: None,
            actual_time: None,
            lagged_delay_1: None,
            lagged_delay_2: None,
            actual_headway_seconds: None,
            headway_ratio: None,
            route_rolling_delay: None,
            period_of_day: None,
            is_peak: false,
            trip_progress: None,
            rolling_mean_delay_trip: None,
        }
    }

    #[test]
    fn test_null_counts_cover_every_column() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let counts = EnrichedStopEvent::null_counts(&[blank(day)]);

        assert_eq!(counts.len(), 26);
        assert_eq!(counts["match_key"], 0);
        assert_eq!(counts["trip_uid"], 1);
        assert_eq!(counts["route_id"], 1);
        assert_eq!(counts["service_date"], 0);
        assert_eq!(counts["is_peak"], 0);
        assert_eq!(counts["rolling_mean_delay_trip"], 1);
    }

    #[test]
    fn test_period_of_day_peak_flag() {
        assert!(PeriodOfDay::MorningPeak.is_peak());
        assert!(PeriodOfDay::EveningPeak.is_peak());
        assert!(!PeriodOfDay::Midday.is_peak());
        assert!(!PeriodOfDay::OffPeak.is_peak());
    }
}
