use async_graphql::{EmptyMutation, EmptySubscription, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{Extension, Router, routing::get};

pub use crate::modules::gallery::use_cases::list_items_by_category::inbound::graphql::QueryRoot;
use crate::shell::state::AppState;

pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(state)
        .finish()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema(state)))
}

async fn graphql(Extension(schema): Extension<AppSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> axum::response::Html<String> {
    use async_graphql::http::GraphiQLSource;
    axum::response::Html(GraphiQLSource::build().endpoint("/gql").finish())
}
