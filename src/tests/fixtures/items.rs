// Shared test fixtures for gallery items.

use crate::modules::gallery::adapters::outbound::item_store::{ItemStore, ItemTransaction};
use crate::modules::gallery::adapters::outbound::item_store_in_memory::InMemoryItemStore;
use crate::modules::gallery::core::item::{ItemId, QueryItem};
use crate::modules::gallery::core::merge::ItemPatch;

pub fn make_item(id: ItemId, name: &str, category: &str, likes: i64) -> QueryItem {
    QueryItem {
        id,
        name: Some(name.to_string()),
        category: Some(category.to_string()),
        likes,
    }
}

pub fn details_patch() -> ItemPatch {
    ItemPatch::Details {
        name: "Calinou".into(),
        category: "animals".into(),
    }
}

/// Commit `items` one transaction each, in order.
pub async fn seed(store: &InMemoryItemStore, items: Vec<QueryItem>) {
    for item in items {
        let mut transaction = store.begin().await.expect("seed: begin failed");
        transaction.create(item).await.expect("seed: create failed");
        transaction.commit().await.expect("seed: commit failed");
    }
}
