//! Object key conventions.
//!
//! Downstream consumers address these keys verbatim, so the layout must be
//! reproduced bit-exactly: `date=YYYY-MM-DD` partition directories with the
//! service day repeated in the file name.

use chrono::NaiveDate;

fn day_str(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

pub fn processed_object(day: NaiveDate) -> String {
    let d = day_str(day);
    format!("processed/gtfs_with_delays/date={d}/mta_delays_{d}.csv")
}

pub fn cleaned_scheduled_object(day: NaiveDate) -> String {
    let d = day_str(day);
    format!("cleaned/gtfs_clean_scheduled/date={d}/gtfs_scheduled_{d}.csv")
}

pub fn cleaned_unscheduled_object(day: NaiveDate) -> String {
    let d = day_str(day);
    format!("cleaned/gtfs_clean_unscheduled/date={d}/gtfs_unscheduled_{d}.csv")
}

pub fn quality_scheduled_object(day: NaiveDate) -> String {
    let d = day_str(day);
    format!("cleaned/gtfs_clean_scheduled/date={d}/quality_report_{d}.json")
}

pub fn quality_unscheduled_object(day: NaiveDate) -> String {
    let d = day_str(day);
    format!("cleaned/gtfs_clean_unscheduled/date={d}/quality_report_{d}.json")
}

/// Iterates calendar days from `start` through `end`, both inclusive.
/// An inverted range yields nothing.
pub fn service_days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}
