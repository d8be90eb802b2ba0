//! Day-range orchestration: read, clean, write, one service day at a time.
//!
//! Per-day policy: a missing input object skips the day, any other failure
//! fails the day, and neither stops the remaining days. Output writes are
//! keyed by service date, so re-running a range overwrites in place.

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::cleaner::{self, report};
use crate::config::CleanConfig;
use crate::error::{CleanError, CleanResult};
use crate::paths;
use crate::store::{self, ObjectStore};

/// Outcome counts of one range run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RangeSummary {
    pub processed: u32,
    pub skipped: u32,
    pub failed: u32,
}

/// Cleans every service day in `[start, end]`, both inclusive.
pub async fn run_range(
    store: &dyn ObjectStore,
    start: NaiveDate,
    end: NaiveDate,
    cfg: &CleanConfig,
) -> RangeSummary {
    let mut summary = RangeSummary::default();

    for date in paths::service_days(start, end) {
        match process_day(store, date, cfg).await {
            Ok((scheduled, unscheduled)) => {
                summary.processed += 1;
                info!(date = %date, scheduled, unscheduled, "day cleaned");
            }
            Err(CleanError::NotFound(key)) => {
                summary.skipped += 1;
                warn!(date = %date, key = %key, "no input for day, skipping");
            }
            Err(e) => {
                summary.failed += 1;
                error!(date = %date, error = %e, "day failed");
            }
        }
    }

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.failed,
        "range complete"
    );
    summary
}

/// Runs one day end to end and returns the partition sizes. The four output
/// objects are written in a fixed order; if any write fails, the objects
/// already written for this day are deleted so the day's outputs never exist
/// half-complete.
#[tracing::instrument(skip(store, cfg), fields(date = %date))]
async fn process_day(
    store: &dyn ObjectStore,
    date: NaiveDate,
    cfg: &CleanConfig,
) -> CleanResult<(usize, usize)> {
    let raw = store::read_table(store, &paths::processed_object(date)).await?;
    let rows_before = raw.len();

    let partitions = cleaner::transform_day(&raw, date, cfg)?;
    let scheduled_report = report::quality_report(rows_before, &partitions.scheduled, "scheduled");
    let unscheduled_report =
        report::quality_report(rows_before, &partitions.unscheduled, "unscheduled");

    let mut written: Vec<String> = Vec::with_capacity(4);
    let result = async {
        let key = paths::cleaned_scheduled_object(date);
        store::write_table(store, &key, &partitions.scheduled).await?;
        written.push(key);

        let key = paths::quality_scheduled_object(date);
        store::write_report(store, &key, &scheduled_report).await?;
        written.push(key);

        let key = paths::cleaned_unscheduled_object(date);
        store::write_table(store, &key, &partitions.unscheduled).await?;
        written.push(key);

        let key = paths::quality_unscheduled_object(date);
        store::write_report(store, &key, &unscheduled_report).await?;
        written.push(key);
        Ok(())
    }
    .await;

    if let Err(e) = result {
        rollback(store, &written).await;
        return Err(e);
    }

    Ok((partitions.scheduled.len(), partitions.unscheduled.len()))
}

// Best-effort: a failed delete is logged and the original error still wins.
async fn rollback(store: &dyn ObjectStore, written: &[String]) {
    for key in written {
        if let Err(e) = store.delete(key).await {
            warn!(key = %key, error = %e, "rollback delete failed");
        }
    }
}
