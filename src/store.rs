//! Object storage seam between the pipeline and the outside world.

pub mod local;
pub mod s3;

use async_trait::async_trait;

use crate::cleaner::report::QualityReport;
use crate::error::CleanResult;
use crate::model::EnrichedStopEvent;
use crate::table::{self, RawTable};

pub use local::LocalStore;
pub use s3::S3Store;

/// The minimal object-store surface the pipeline needs. `put` is an
/// overwrite, so re-running a day replaces its outputs instead of failing.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, key: &str) -> CleanResult<Vec<u8>>;
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> CleanResult<()>;
    async fn delete(&self, key: &str) -> CleanResult<()>;
}

/// Reads and decodes one day's raw table.
pub async fn read_table(store: &dyn ObjectStore, path: &str) -> CleanResult<RawTable> {
    let bytes = store.get(path).await?;
    table::decode_table(&bytes)
}

/// Encodes and writes one cleaned partition.
pub async fn write_table(
    store: &dyn ObjectStore,
    path: &str,
    rows: &[EnrichedStopEvent],
) -> CleanResult<()> {
    let bytes = table::encode_table(rows)?;
    store.put(path, bytes, "text/csv").await
}

/// Writes one quality report as pretty-printed JSON.
pub async fn write_report(
    store: &dyn ObjectStore,
    path: &str,
    report: &QualityReport,
) -> CleanResult<()> {
    let bytes = serde_json::to_vec_pretty(report)?;
    store.put(path, bytes, "application/json").await
}
