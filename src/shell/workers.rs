// Background workers: one lane per topic plus the dead letter drain.

use crate::modules::gallery::adapters::outbound::item_store::ItemStore;
use crate::modules::gallery::core::events::{LikesAdded, PhotoCreated};
use crate::modules::gallery::use_cases::reconcile_item::lane::{DeadLetter, Lane, LaneSender};
use crate::shared::infrastructure::retry::RetryStrategy;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct Workers {
    pub photos: LaneSender,
    pub likes: LaneSender,
    pub dead_letters: mpsc::Receiver<DeadLetter>,
    pub handles: Vec<JoinHandle<()>>,
}

pub fn spawn_lanes<TStore, TStrategy>(
    store: Arc<TStore>,
    strategy: TStrategy,
    capacity: usize,
) -> Workers
where
    TStore: ItemStore + 'static,
    TStrategy: RetryStrategy + Clone + 'static,
{
    let (photos, photos_inbox) = mpsc::channel(capacity);
    let (likes, likes_inbox) = mpsc::channel(capacity);
    let (dead_letter_sender, dead_letters) = mpsc::channel(capacity);

    let photos_lane = Lane::<PhotoCreated, _, _>::new(store.clone(), strategy.clone());
    let likes_lane = Lane::<LikesAdded, _, _>::new(store, strategy);

    let handles = vec![
        tokio::spawn(photos_lane.run(photos_inbox, dead_letter_sender.clone())),
        tokio::spawn(likes_lane.run(likes_inbox, dead_letter_sender)),
    ];

    Workers {
        photos,
        likes,
        dead_letters,
        handles,
    }
}

/// Log every dead letter until all lanes have stopped.
pub async fn drain_dead_letters(mut dead_letters: mpsc::Receiver<DeadLetter>) {
    while let Some(letter) = dead_letters.recv().await {
        tracing::error!(
            lane = letter.lane,
            payload = %String::from_utf8_lossy(&letter.payload),
            reason = %letter.reason,
            "dead letter"
        );
    }
}
