//! Per-row features that depend only on the row itself and the service day.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate};

use crate::model::{EnrichedStopEvent, StopEvent};

/// Attaches every order-independent feature to an event. All time-series
/// columns are left null for the series pass.
pub fn derive_scalar(event: StopEvent, service_date: NaiveDate) -> EnrichedStopEvent {
    let hour = event
        .scheduled_seconds
        .or(event.actual_seconds)
        .map(hour_of_day);
    let angle = hour.map(|h| 2.0 * PI * f64::from(h) / 24.0);
    let dow = service_date.weekday().num_days_from_monday();
    let scheduled_time = event.scheduled_seconds.map(clock_time);
    let actual_time = event.actual_seconds.map(clock_time);

    EnrichedStopEvent {
        match_key: event.match_key,
        trip_uid: event.trip_uid,
        route_id: event.route_id,
        stop_id: event.stop_id,
        is_unscheduled: event.is_unscheduled,
        scheduled_seconds: event.scheduled_seconds,
        actual_seconds: event.actual_seconds,
        delay_seconds: event.delay_seconds,
        delay_minutes: event.delay_minutes,
        service_date,
        hour,
        hour_sin: angle.map(f64::sin),
        hour_cos: angle.map(f64::cos),
        dow,
        is_weekend: dow >= 5,
        scheduled_time,
        actual_time,
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

fn hour_of_day(seconds: f64) -> u32 {
    ((seconds / 3_600.0).floor() as i64).rem_euclid(24) as u32
}

/// Renders seconds-since-midnight as a zero-padded HH:MM:SS clock string.
/// Values past the civil day wrap around it (late-night service routinely
/// runs past 24:00); negatives wrap backwards. Fractional seconds floor.
fn clock_time(seconds: f64) -> String {
    let total = (seconds.floor() as i64).rem_euclid(86_400);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3_600,
        (total % 3_600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_seconds(scheduled: Option<f64>, actual: Option<f64>) -> StopEvent {
        StopEvent {
            scheduled_seconds: scheduled,
            actual_seconds: actual,
            ..StopEvent::default()
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn test_hour_prefers_scheduled_over_actual() {
        let row = derive_scalar(event_with_seconds(Some(3_600.0), Some(7_200.0)), monday());
        assert_eq!(row.hour, Some(1));

        let row = derive_scalar(event_with_seconds(None, Some(7_200.0)), monday());
        assert_eq!(row.hour, Some(2));

        let row = derive_scalar(event_with_seconds(None, None), monday());
        assert_eq!(row.hour, None);
    }

    #[test]
    fn test_hour_wraps_past_midnight_and_below_zero() {
        // 25:30 service time lands in hour 1 of the next civil day
        let row = derive_scalar(event_with_seconds(Some(91_800.0), None), monday());
        assert_eq!(row.hour, Some(1));

        let row = derive_scalar(event_with_seconds(Some(-1.0), None), monday());
        assert_eq!(row.hour, Some(23));
    }

    #[test]
    fn test_cyclical_encoding_at_six() {
        let row = derive_scalar(event_with_seconds(Some(6.0 * 3_600.0), None), monday());
        assert!((row.hour_sin.unwrap() - 1.0).abs() < 1e-12);
        assert!(row.hour_cos.unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_clock_time_rendering() {
        assert_eq!(clock_time(0.0), "00:00:00");
        assert_eq!(clock_time(23_400.0), "06:30:00");
        assert_eq!(clock_time(100.9), "00:01:40");
        assert_eq!(clock_time(90_000.0), "01:00:00");
        assert_eq!(clock_time(-10.5), "23:59:49");
        assert_eq!(clock_time(86_399.0), "23:59:59");
    }

    #[test]
    fn test_null_seconds_render_as_null_not_text() {
        let row = derive_scalar(event_with_seconds(None, Some(120.0)), monday());
        assert_eq!(row.scheduled_time, None);
        assert_eq!(row.actual_time.as_deref(), Some("00:02:00"));
    }

    #[test]
    fn test_day_of_week_and_weekend() {
        let row = derive_scalar(event_with_seconds(Some(0.0), None), monday());
        assert_eq!(row.dow, 0);
        assert!(!row.is_weekend);

        let saturday = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        let row = derive_scalar(event_with_seconds(Some(0.0), None), saturday);
        assert_eq!(row.dow, 5);
        assert!(row.is_weekend);

        let sunday = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let row = derive_scalar(event_with_seconds(Some(0.0), None), sunday);
        assert_eq!(row.dow, 6);
        assert!(row.is_weekend);
        assert_eq!(row.service_date, sunday);
    }
}
