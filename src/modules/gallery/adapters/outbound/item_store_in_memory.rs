// In memory implementation of the ItemStore port, and of the listing queries.
//
// Purpose
// - Run the reconciliation without a database, in tests and local development.
//
// Responsibilities
// - Keep committed rows in a map keyed by item id, with a version per row and
//   an insertion sequence that defines the natural row order.
// - Buffer writes per transaction and validate them atomically at commit:
//   creates must still be unique, updates must still see the version they read.
// - Expose fault toggles so tests can force offline stores, commit failures
//   and slow commits that open a race window.

use crate::modules::gallery::adapters::outbound::item_store::{
    ItemStore, ItemTransaction, StoreError,
};
use crate::modules::gallery::core::item::{ItemId, QueryItem};
use crate::modules::gallery::use_cases::list_items_by_category::queries_port::ItemQueries;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredRow {
    item: QueryItem,
    version: u64,
    sequence: u64,
}

#[derive(Default)]
struct Table {
    rows: HashMap<ItemId, StoredRow>,
    next_sequence: u64,
}

#[derive(Default)]
struct Faults {
    failing_commits: AtomicU32,
    delay_commit_ms: AtomicU64,
    committed: AtomicU64,
    rejected: AtomicU64,
}

#[derive(Default)]
pub struct InMemoryItemStore {
    table: Arc<RwLock<Table>>,
    faults: Arc<Faults>,
    is_offline: bool,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Make the next `count` commits fail with `StoreError::Aborted`.
    pub fn fail_next_commits(&self, count: u32) {
        self.faults.failing_commits.store(count, Ordering::SeqCst);
    }

    /// Delay every commit before it validates, widening the window in which
    /// two transactions can both miss a row and both try to create it.
    pub fn set_delay_commit_ms(&self, ms: u64) {
        self.faults.delay_commit_ms.store(ms, Ordering::SeqCst);
    }

    pub fn committed_transactions(&self) -> u64 {
        self.faults.committed.load(Ordering::SeqCst)
    }

    pub fn rejected_commits(&self) -> u64 {
        self.faults.rejected.load(Ordering::SeqCst)
    }

    /// Committed rows in natural row order.
    pub async fn rows(&self) -> Vec<QueryItem> {
        let table = self.table.read().await;
        let mut rows: Vec<&StoredRow> = table.rows.values().collect();
        rows.sort_by_key(|row| row.sequence);
        rows.into_iter().map(|row| row.item.clone()).collect()
    }
}

#[async_trait::async_trait]
impl ItemStore for InMemoryItemStore {
    type Transaction = InMemoryItemTransaction;

    async fn begin(&self) -> Result<InMemoryItemTransaction, StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("Entity store offline".into()));
        }

        Ok(InMemoryItemTransaction {
            id: Uuid::now_v7(),
            table: self.table.clone(),
            faults: self.faults.clone(),
            read_versions: HashMap::new(),
            writes: HashMap::new(),
        })
    }
}

#[derive(Debug)]
enum PendingWrite {
    Insert(QueryItem),
    Update { item: QueryItem, read_version: u64 },
}

impl PendingWrite {
    fn item(&self) -> &QueryItem {
        match self {
            PendingWrite::Insert(item) | PendingWrite::Update { item, .. } => item,
        }
    }
}

pub struct InMemoryItemTransaction {
    id: Uuid,
    table: Arc<RwLock<Table>>,
    faults: Arc<Faults>,
    read_versions: HashMap<ItemId, u64>,
    writes: HashMap<ItemId, PendingWrite>,
}

impl InMemoryItemTransaction {
    fn reject(&self, error: StoreError) -> Result<(), StoreError> {
        self.faults.rejected.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            transaction = %self.id,
            %error,
            discarded = self.writes.len(),
            "commit rejected, transaction rolled back"
        );
        Err(error)
    }

    fn take_injected_failure(&self) -> bool {
        self.faults
            .failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait::async_trait]
impl ItemTransaction for InMemoryItemTransaction {
    async fn find(&mut self, id: ItemId) -> Result<Option<QueryItem>, StoreError> {
        if let Some(write) = self.writes.get(&id) {
            return Ok(Some(write.item().clone()));
        }

        let table = self.table.read().await;
        Ok(table.rows.get(&id).map(|row| {
            self.read_versions.insert(id, row.version);
            row.item.clone()
        }))
    }

    async fn create(&mut self, item: QueryItem) -> Result<(), StoreError> {
        let id = item.id;
        if self.writes.contains_key(&id) || self.table.read().await.rows.contains_key(&id) {
            return Err(StoreError::UniqueViolation { id });
        }
        self.writes.insert(id, PendingWrite::Insert(item));
        Ok(())
    }

    async fn update(&mut self, item: QueryItem) -> Result<(), StoreError> {
        let id = item.id;
        let write = match self.writes.remove(&id) {
            Some(PendingWrite::Insert(_)) => PendingWrite::Insert(item),
            Some(PendingWrite::Update { read_version, .. }) => {
                PendingWrite::Update { item, read_version }
            }
            None => match self.read_versions.get(&id) {
                Some(&read_version) => PendingWrite::Update { item, read_version },
                None => {
                    return Err(StoreError::Backend(format!(
                        "item {id} was not loaded in transaction {}",
                        self.id
                    )));
                }
            },
        };
        self.writes.insert(id, write);
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        let delay = self.faults.delay_commit_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.take_injected_failure() {
            return self.reject(StoreError::Aborted("injected commit failure".into()));
        }

        let mut table = self.table.write().await;
        for (id, write) in &self.writes {
            let current = table.rows.get(id).map(|row| row.version);
            match (write, current) {
                (PendingWrite::Insert(_), Some(_)) => {
                    return self.reject(StoreError::UniqueViolation { id: *id });
                }
                (PendingWrite::Update { read_version, .. }, actual)
                    if actual != Some(*read_version) =>
                {
                    return self.reject(StoreError::StaleRow {
                        id: *id,
                        expected: *read_version,
                        actual: actual.unwrap_or(0),
                    });
                }
                _ => {}
            }
        }

        for (id, write) in self.writes {
            match write {
                PendingWrite::Insert(item) => {
                    let sequence = table.next_sequence;
                    table.next_sequence += 1;
                    table.rows.insert(
                        id,
                        StoredRow {
                            item,
                            version: 1,
                            sequence,
                        },
                    );
                }
                PendingWrite::Update { item, .. } => {
                    if let Some(row) = table.rows.get_mut(&id) {
                        row.item = item;
                        row.version += 1;
                    }
                }
            }
        }
        self.faults.committed.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(transaction = %self.id, "transaction committed");
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        tracing::debug!(
            transaction = %self.id,
            discarded = self.writes.len(),
            "transaction rolled back"
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl ItemQueries for InMemoryItemStore {
    async fn list_by_category(&self, category: &str) -> anyhow::Result<Vec<QueryItem>> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Entity store offline"));
        }

        let mut items: Vec<QueryItem> = self
            .rows()
            .await
            .into_iter()
            .filter(|item| item.category.as_deref() == Some(category))
            .collect();
        // stable, so equal likes keep natural row order
        items.sort_by(|a, b| b.likes.cmp(&a.likes));
        Ok(items)
    }
}
