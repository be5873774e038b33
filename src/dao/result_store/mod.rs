//! Result persistence contract and its backends.

/// MongoDB-backed result store.
pub mod mongodb;

use futures::future::BoxFuture;

use crate::dao::models::{NewResultRecord, ResultRecordEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for quiz result records.
///
/// Records are append-only: a successful insert creates exactly one new
/// record and existing records are never mutated or deleted.
pub trait ResultStore: Send + Sync {
    /// Append a record and return it with its store-assigned identifier.
    fn insert_result(
        &self,
        record: NewResultRecord,
    ) -> BoxFuture<'static, StorageResult<ResultRecordEntity>>;
    /// All records ordered by score descending; ties keep insertion order.
    fn list_results(&self) -> BoxFuture<'static, StorageResult<Vec<ResultRecordEntity>>>;
    /// Cheap connectivity probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
