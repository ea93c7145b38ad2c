// Stream consumer lane: one per event topic.
//
// Purpose
// - Drain one inbound channel strictly in delivery order, one event at a time.
//
// Responsibilities
// - Deserialize the raw payload. Malformed payloads are never retried, they go
//   to the dead letter channel.
// - Run the transactional upsert through the retry executor and only move on
//   to the next event once it has committed or the strategy gave up.
//
// Boundaries
// - Lanes share nothing but the store. There is no ordering between lanes.

use crate::modules::gallery::adapters::outbound::item_store::ItemStore;
use crate::modules::gallery::core::events::ItemEvent;
use crate::modules::gallery::core::item::QueryItem;
use crate::modules::gallery::use_cases::reconcile_item::handler::{
    ReconcileError, ReconcileItemHandler,
};
use crate::shared::infrastructure::retry::{RetryError, RetryExecutor, RetryStrategy};
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::Instrument;

pub type LaneSender = mpsc::Sender<Vec<u8>>;

#[derive(Debug, Error)]
pub enum LaneError {
    #[error("malformed {lane} payload: {source}")]
    Deserialize {
        lane: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Reconcile(#[from] RetryError<ReconcileError>),
}

/// An event the lane could not apply, handed back to the transport with the
/// payload bytes exactly as they were received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub lane: &'static str,
    pub payload: Vec<u8>,
    pub reason: String,
}

pub struct Lane<TEvent, TStore, TStrategy>
where
    TEvent: ItemEvent,
    TStore: ItemStore + 'static,
    TStrategy: RetryStrategy,
{
    handler: ReconcileItemHandler<TStore>,
    executor: RetryExecutor<TStrategy>,
    _event: PhantomData<fn() -> TEvent>,
}

impl<TEvent, TStore, TStrategy> Lane<TEvent, TStore, TStrategy>
where
    TEvent: ItemEvent,
    TStore: ItemStore + 'static,
    TStrategy: RetryStrategy,
{
    pub fn new(store: Arc<TStore>, strategy: TStrategy) -> Self {
        Self {
            handler: ReconcileItemHandler::new(store),
            executor: RetryExecutor::new(strategy),
            _event: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        TEvent::TOPIC
    }

    pub async fn process(&self, payload: &[u8]) -> Result<QueryItem, LaneError> {
        let event: TEvent =
            serde_json::from_slice(payload).map_err(|source| LaneError::Deserialize {
                lane: TEvent::TOPIC,
                source,
            })?;
        let id = event.item_id();
        let patch = &event.patch();
        let handler = &self.handler;

        let item = self
            .executor
            .execute(move || handler.handle(id, patch))
            .await?;
        Ok(item)
    }

    /// Consume `inbox` until every sender is dropped.
    pub async fn run(
        self,
        mut inbox: mpsc::Receiver<Vec<u8>>,
        dead_letters: mpsc::Sender<DeadLetter>,
    ) {
        let span = tracing::info_span!("lane", lane = TEvent::TOPIC);
        async move {
            tracing::info!("lane started");
            while let Some(payload) = inbox.recv().await {
                let applied = self.process(&payload).await;
                if let Err(error) = applied {
                    tracing::error!(%error, "event not applied");
                    let letter = DeadLetter {
                        lane: TEvent::TOPIC,
                        payload,
                        reason: error.to_string(),
                    };
                    if dead_letters.send(letter).await.is_err() {
                        tracing::warn!("dead letter channel closed, dropping event");
                    }
                }
            }
            tracing::info!("lane stopped");
        }
        .instrument(span)
        .await
    }
}
