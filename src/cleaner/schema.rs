//! Required-column validation, the first gate of a day's run.

use crate::error::{CleanError, CleanResult};
use crate::table::RawTable;

/// Columns the upstream processed table must always carry. `trip_uid` is
/// deliberately absent: it is optional and only strengthens trip grouping
/// when present.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "match_key",
    "route_id",
    "stop_id",
    "is_unscheduled",
    "scheduled_seconds",
    "actual_seconds",
    "delay_seconds",
    "delay_minutes",
];

/// Checks that every required column exists, reporting all missing columns
/// at once. Runs before any coercion or filtering; a failure fails the day.
pub fn validate_schema(table: &RawTable) -> CleanResult<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CleanError::Schema { missing })
    }
}
