use crate::modules::gallery::adapters::outbound::item_store::{
    ItemStore, ItemTransaction, StoreError,
};
use crate::modules::gallery::core::item::{ItemId, QueryItem};
use crate::modules::gallery::core::merge::{ItemPatch, merge};
use crate::shared::infrastructure::retry::Retryable;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("failed to persist item: {0}")]
    PersistenceConflict(#[source] StoreError),
}

impl Retryable for ReconcileError {
    fn is_persistence_conflict(&self) -> bool {
        matches!(self, ReconcileError::PersistenceConflict(_))
    }
}

/// Find-or-create-then-merge of one event payload, inside a single store transaction.
pub struct ReconcileItemHandler<TStore>
where
    TStore: ItemStore + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> ReconcileItemHandler<TStore>
where
    TStore: ItemStore + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    /// Every failure between begin and commit is reported as a persistence
    /// conflict, after the transaction has been rolled back.
    pub async fn handle(&self, id: ItemId, patch: &ItemPatch) -> Result<QueryItem, ReconcileError> {
        let mut transaction = self
            .store
            .begin()
            .await
            .map_err(ReconcileError::PersistenceConflict)?;

        let item = match upsert(&mut transaction, id, patch).await {
            Ok(item) => item,
            Err(error) => {
                transaction
                    .rollback()
                    .await
                    .map_err(ReconcileError::PersistenceConflict)?;
                return Err(ReconcileError::PersistenceConflict(error));
            }
        };

        transaction
            .commit()
            .await
            .map_err(ReconcileError::PersistenceConflict)?;

        tracing::info!(%item, "updated in data store");
        Ok(item)
    }
}

async fn upsert<TTransaction>(
    transaction: &mut TTransaction,
    id: ItemId,
    patch: &ItemPatch,
) -> Result<QueryItem, StoreError>
where
    TTransaction: ItemTransaction,
{
    let saved = match transaction.find(id).await? {
        Some(item) => item,
        None => {
            let item = QueryItem::new(id);
            transaction.create(item.clone()).await?;
            item
        }
    };
    let item = merge(saved, patch);
    transaction.update(item.clone()).await?;
    Ok(item)
}
