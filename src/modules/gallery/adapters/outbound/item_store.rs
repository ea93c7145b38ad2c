// Port for the transactional store that holds the materialized gallery rows.
//
// Purpose
// - Describe the minimal transactional contract the reconciliation needs:
//   begin, find, create, update, commit, rollback.
//
// Boundaries
// - The store is the only arbiter of concurrent writes. It enforces identifier
//   uniqueness on create and rejects stale updates at commit. Callers react to
//   these failures, they never lock around the store.

use crate::modules::gallery::core::item::{ItemId, QueryItem};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("unique constraint violated: item {id} already exists")]
    UniqueViolation { id: ItemId },

    #[error("stale row: item {id} expected version {expected}, actual {actual}")]
    StaleRow {
        id: ItemId,
        expected: u64,
        actual: u64,
    },

    #[error("transaction aborted: {0}")]
    Aborted(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    type Transaction: ItemTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StoreError>;
}

/// A unit of work against the store. Writes stay private to the transaction
/// until `commit` succeeds. Reads see committed rows plus the transaction's own
/// pending writes.
#[async_trait]
pub trait ItemTransaction: Send {
    async fn find(&mut self, id: ItemId) -> Result<Option<QueryItem>, StoreError>;

    /// Stage a new row. Fails with `UniqueViolation` if the id is already taken.
    async fn create(&mut self, item: QueryItem) -> Result<(), StoreError>;

    /// Stage new field values for a row previously returned by `find` or staged by `create`.
    async fn update(&mut self, item: QueryItem) -> Result<(), StoreError>;

    /// Apply every staged write atomically. A failed commit rolls the
    /// transaction back before returning the error, so none of its writes are
    /// visible and there is nothing left for the caller to roll back.
    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}
