/// Identifier assigned by the producer of photo created events.
pub type ItemId = i64;

/// One row of the materialized gallery view.
///
/// `name` and `category` stay empty until the photo created event for this id
/// is applied, `likes` stays at zero until a likes event is applied. Either half
/// may be visible on its own.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueryItem {
    pub id: ItemId,
    pub name: Option<String>,
    pub category: Option<String>,
    pub likes: i64,
}

impl QueryItem {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            name: None,
            category: None,
            likes: 0,
        }
    }
}

impl std::fmt::Display for QueryItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "QueryItem [id={}, name={}, category={}, likes={}]",
            self.id,
            self.name.as_deref().unwrap_or("null"),
            self.category.as_deref().unwrap_or("null"),
            self.likes
        )
    }
}
