//! Partitioning of the enriched table into scheduled and unscheduled sets.

use crate::model::EnrichedStopEvent;

/// Both output partitions of one service day, in cleaned row order.
#[derive(Debug, Default)]
pub struct DayPartitions {
    pub scheduled: Vec<EnrichedStopEvent>,
    pub unscheduled: Vec<EnrichedStopEvent>,
}

/// Splits on `is_unscheduled` and enforces each partition's completeness
/// rules. Scheduled rows must carry a timetable reference (`route_id` and
/// `scheduled_seconds`); unscheduled rows must at least have been observed
/// (`actual_seconds`). A row with an unknown flag satisfies neither
/// definition and lands in neither partition.
pub fn split_partitions(rows: Vec<EnrichedStopEvent>) -> DayPartitions {
    let mut partitions = DayPartitions::default();
    for row in rows {
        match row.is_unscheduled {
            Some(false) if row.route_id.is_some() && row.scheduled_seconds.is_some() => {
                partitions.scheduled.push(row);
            }
            Some(true) if row.actual_seconds.is_some() => {
                partitions.unscheduled.push(row);
            }
            _ => {}
        }
    }
    partitions
}
