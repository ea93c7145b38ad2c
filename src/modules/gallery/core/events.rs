use crate::modules::gallery::core::item::ItemId;
use crate::modules::gallery::core::merge::ItemPatch;
use serde::de::DeserializeOwned;

pub const PHOTOS_TOPIC: &str = "photos";
pub const LIKES_TOPIC: &str = "likes";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct PhotoCreated {
    pub id: ItemId,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct LikesAdded {
    pub id: ItemId,
    pub likes: i64,
}

/// An inbound event that contributes part of a gallery item.
///
/// Each event type owns a disjoint set of fields, exposed through `patch`.
pub trait ItemEvent: DeserializeOwned + Send + Sync + 'static {
    const TOPIC: &'static str;

    fn item_id(&self) -> ItemId;
    fn patch(&self) -> ItemPatch;
}

impl ItemEvent for PhotoCreated {
    const TOPIC: &'static str = PHOTOS_TOPIC;

    fn item_id(&self) -> ItemId {
        self.id
    }

    fn patch(&self) -> ItemPatch {
        ItemPatch::Details {
            name: self.name.clone(),
            category: self.category.clone(),
        }
    }
}

impl ItemEvent for LikesAdded {
    const TOPIC: &'static str = LIKES_TOPIC;

    fn item_id(&self) -> ItemId {
        self.id
    }

    fn patch(&self) -> ItemPatch {
        ItemPatch::Likes(self.likes)
    }
}
