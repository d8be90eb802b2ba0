//! Cell-level coercion from raw strings to typed stop-events.
//!
//! Coercion is total: a malformed cell becomes null, never an error, so one
//! bad value cannot take down a whole day.

use crate::model::StopEvent;
use crate::table::RawTable;

/// Turns each raw row into a typed event. Column positions are resolved once
/// from the header, so row layout never has to match the struct order.
pub fn coerce_events(table: &RawTable) -> Vec<StopEvent> {
    let match_key = table.column_index("match_key");
    let trip_uid = table.column_index("trip_uid");
    let route_id = table.column_index("route_id");
    let stop_id = table.column_index("stop_id");
    let is_unscheduled = table.column_index("is_unscheduled");
    let scheduled_seconds = table.column_index("scheduled_seconds");
    let actual_seconds = table.column_index("actual_seconds");
    let delay_seconds = table.column_index("delay_seconds");
    let delay_minutes = table.column_index("delay_minutes");

    table
        .rows()
        .iter()
        .map(|row| StopEvent {
            match_key: text(row, match_key),
            trip_uid: text(row, trip_uid),
            route_id: text(row, route_id),
            stop_id: text(row, stop_id),
            is_unscheduled: boolean(row, is_unscheduled),
            scheduled_seconds: numeric(row, scheduled_seconds),
            actual_seconds: numeric(row, actual_seconds),
            delay_seconds: numeric(row, delay_seconds),
            delay_minutes: numeric(row, delay_minutes),
        })
        .collect()
}

fn cell<'a>(row: &'a [String], idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| row.get(i))
        .map(String::as_str)
        .filter(|s| !s.is_empty())
}

fn text(row: &[String], idx: Option<usize>) -> Option<String> {
    cell(row, idx).map(str::to_string)
}

fn boolean(row: &[String], idx: Option<usize>) -> Option<bool> {
    match cell(row, idx)?.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Some(true),
        "false" | "f" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn numeric(row: &[String], idx: Option<usize>) -> Option<f64> {
    cell(row, idx)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
