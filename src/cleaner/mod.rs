//! The per-day cleaning pipeline.
//!
//! Order matters: schema validation, coercion, key filtering, deduplication,
//! outlier removal, scalar features, series features, then the split.

pub mod coerce;
pub mod features;
pub mod filter;
pub mod report;
pub mod schema;
pub mod series;
pub mod split;

use chrono::NaiveDate;

use crate::config::CleanConfig;
use crate::error::CleanResult;
use crate::table::RawTable;
pub use split::DayPartitions;

/// Runs one raw day table through the whole pipeline. Pure of I/O; the only
/// failure mode is a broken schema.
pub fn transform_day(
    table: &RawTable,
    service_date: NaiveDate,
    cfg: &CleanConfig,
) -> CleanResult<DayPartitions> {
    schema::validate_schema(table)?;

    let events = coerce::coerce_events(table);
    let events = filter::drop_unkeyed(events);
    let events = filter::deduplicate(events);
    let events = filter::filter_delay_outliers(events, cfg.max_abs_delay_seconds);

    let mut enriched: Vec<_> = events
        .into_iter()
        .map(|e| features::derive_scalar(e, service_date))
        .collect();
    series::derive_series(&mut enriched, cfg);

    Ok(split::split_partitions(enriched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleanError;

    const COLUMNS: [&str; 9] = [
        "match_key",
        "trip_uid",
        "route_id",
        "stop_id",
        "is_unscheduled",
        "scheduled_seconds",
        "actual_seconds",
        "delay_seconds",
        "delay_minutes",
    ];

    fn table(rows: &[[&str; 9]]) -> RawTable {
        RawTable::new(
            COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn test_missing_columns_fail_the_day() {
        let table = RawTable::new(
            vec!["match_key".to_string(), "stop_id".to_string()],
            vec![],
        );
        let err = transform_day(&table, day(), &CleanConfig::default()).unwrap_err();
        assert!(matches!(err, CleanError::Schema { .. }));
    }

    #[test]
    fn test_full_day_flow() {
        let raw = table(&[
            // scheduled trip with two stops
            ["k1", "t1", "1", "101N", "false", "23400", "23520", "120", "2"],
            ["k1", "t1", "1", "102N", "false", "23700", "23940", "240", "4"],
            // duplicate of the first row, dropped
            ["k1", "t1", "1", "101N", "false", "23400", "23520", "120", "2"],
            // unscheduled train, observed only
            ["k2", "", "", "101N", "true", "", "23600", "", ""],
            // unkeyed row, dropped
            ["", "", "1", "103N", "false", "23500", "23560", "60", "1"],
            // outlier beyond the band, dropped
            ["k3", "", "1", "104N", "false", "23500", "33000", "9500", "158.3"],
        ]);

        let partitions = transform_day(&raw, day(), &CleanConfig::default()).unwrap();

        assert_eq!(partitions.scheduled.len(), 2);
        assert_eq!(partitions.unscheduled.len(), 1);

        let first = &partitions.scheduled[0];
        assert_eq!(first.match_key.as_deref(), Some("k1"));
        assert_eq!(first.stop_id.as_deref(), Some("101N"));
        assert_eq!(first.hour, Some(6));
        assert_eq!(first.scheduled_time.as_deref(), Some("06:30:00"));
        assert_eq!(first.period_of_day, Some(crate::model::PeriodOfDay::MorningPeak));
        assert!(first.is_peak);
        assert_eq!(first.dow, 0);
        assert!(!first.is_weekend);
        assert_eq!(first.lagged_delay_1, None);

        let second = &partitions.scheduled[1];
        assert_eq!(second.lagged_delay_1, Some(120.0));
        assert_eq!(second.trip_progress, Some(1.0));
        assert_eq!(second.rolling_mean_delay_trip, Some(120.0));

        // headway at 101N: unscheduled train arrives 80s after the first
        let unscheduled = &partitions.unscheduled[0];
        assert_eq!(unscheduled.actual_headway_seconds, Some(80.0));
        assert_eq!(unscheduled.is_unscheduled, Some(true));
    }

    #[test]
    fn test_partition_order_matches_cleaned_input_order() {
        let raw = table(&[
            ["k3", "", "1", "101N", "false", "30000", "30010", "10", "0.2"],
            ["k1", "", "1", "102N", "false", "10000", "10020", "20", "0.3"],
            ["k2", "", "1", "103N", "false", "20000", "20030", "30", "0.5"],
        ]);
        let partitions = transform_day(&raw, day(), &CleanConfig::default()).unwrap();
        let keys: Vec<&str> = partitions
            .scheduled
            .iter()
            .filter_map(|r| r.match_key.as_deref())
            .collect();

        // input order survives even though features sort by time internally
        assert_eq!(keys, vec!["k3", "k1", "k2"]);
    }
}
