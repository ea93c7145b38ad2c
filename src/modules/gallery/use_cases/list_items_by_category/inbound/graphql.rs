use async_graphql::{Context, Object, Result as GqlResult};

use crate::modules::gallery::core::item::QueryItem;
use crate::shell::state::AppState;

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlItem {
    pub id: i64,
    pub name: Option<String>,
    pub category: Option<String>,
    pub likes: i64,
}

impl From<QueryItem> for GqlItem {
    fn from(item: QueryItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            likes: item.likes,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn items_by_category(
        &self,
        context: &Context<'_>,
        category: String,
    ) -> GqlResult<Vec<GqlItem>> {
        let state = context.data_unchecked::<AppState>();
        let items = state.queries.list_by_category(&category).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }
}
