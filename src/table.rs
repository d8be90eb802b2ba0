//! CSV codec for day tables.
//!
//! Input tables arrive as raw CSV bytes and are held column-name-addressable
//! but untyped; typing is the coercer's job. Enriched partitions are written
//! back as CSV with an explicit header so an empty partition still carries
//! its schema.

use crate::error::{CleanError, CleanResult};
use crate::model::EnrichedStopEvent;

/// Column names of the enriched output, in struct order.
pub const OUTPUT_COLUMNS: [&str; 26] = [
    "match_key",
    "trip_uid",
    "route_id",
    "stop_id",
    "is_unscheduled",
    "scheduled_seconds",
    "actual_seconds",
    "delay_seconds",
    "delay_minutes",
    "service_date",
    "hour",
    "hour_sin",
    "hour_cos",
    "dow",
    "is_weekend",
    "scheduled_time",
    "actual_time",
    "lagged_delay_1",
    "lagged_delay_2",
    "actual_headway_seconds",
    "headway_ratio",
    "route_rolling_delay",
    "period_of_day",
    "is_peak",
    "trip_progress",
    "rolling_mean_delay_trip",
];

/// One day's input table exactly as stored: a header plus string cells.
/// An empty cell is the CSV rendering of null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Decodes a raw day table. Ragged or otherwise unreadable CSV is a codec
/// error, which the orchestrator treats as a failed day.
pub fn decode_table(bytes: &[u8]) -> CleanResult<RawTable> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { columns, rows })
}

/// Encodes an enriched partition as CSV bytes, header first.
pub fn encode_table(rows: &[EnrichedStopEvent]) -> CleanResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| CleanError::Codec(e.into_error().into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keeps_empty_cells() {
        let bytes = b"match_key,stop_id,delay_seconds\nA,101N,5\nB,,\n";
        let table = decode_table(bytes).unwrap();

        assert_eq!(table.columns(), &["match_key", "stop_id", "delay_seconds"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1], vec!["B".to_string(), String::new(), String::new()]);
        assert_eq!(table.column_index("stop_id"), Some(1));
        assert!(!table.has_column("direction"));
    }

    #[test]
    fn test_decode_rejects_ragged_rows() {
        let bytes = b"a,b\n1,2\n3\n";
        assert!(decode_table(bytes).is_err());
    }

    #[test]
    fn test_encode_empty_partition_still_has_header() {
        let bytes = encode_table(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("match_key,trip_uid,route_id,stop_id"));
        assert!(header.ends_with("trip_progress,rolling_mean_delay_trip"));
        assert_eq!(lines.next(), None);
    }
}
