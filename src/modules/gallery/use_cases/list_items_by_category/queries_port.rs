use crate::modules::gallery::core::item::QueryItem;
use async_trait::async_trait;

#[async_trait]
pub trait ItemQueries {
    /// Committed rows of `category`, most liked first. Ties keep the store's natural row order.
    async fn list_by_category(&self, category: &str) -> anyhow::Result<Vec<QueryItem>>;
}
