// Field-level merge of a partial event payload into a gallery item row.
//
// Purpose
// - Overwrite only the fields owned by the event type, never the others.
//
// Responsibilities
// - Stay pure and idempotent so the transactional upsert can be replayed.

use crate::modules::gallery::core::item::QueryItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPatch {
    Details { name: String, category: String },
    Likes(i64),
}

pub fn merge(mut item: QueryItem, patch: &ItemPatch) -> QueryItem {
    match patch {
        ItemPatch::Details { name, category } => {
            item.name = Some(name.clone());
            item.category = Some(category.clone());
        }
        ItemPatch::Likes(likes) => {
            item.likes = *likes;
        }
    }
    item
}
