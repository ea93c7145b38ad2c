use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct ListItemsParams {
    pub category: String,
}

pub async fn handle(
    State(state): State<AppState>,
    Query(params): Query<ListItemsParams>,
) -> impl IntoResponse {
    match state.queries.list_by_category(&params.category).await {
        Ok(items) => {
            tracing::info!(
                count = items.len(),
                category = %params.category,
                "returned items in category"
            );
            Json(items).into_response()
        }
        Err(error) => {
            tracing::error!(%error, "listing failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod list_items_by_category_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use super::handle;
    use crate::modules::gallery::adapters::outbound::item_store_in_memory::InMemoryItemStore;
    use crate::shell::state::AppState;
    use crate::tests::fixtures::items::{make_item, seed};

    fn make_test_state(store: InMemoryItemStore) -> AppState {
        let (photos, _) = mpsc::channel(1);
        let (likes, _) = mpsc::channel(1);
        AppState {
            queries: Arc::new(store),
            photos,
            likes,
        }
    }

    fn app(state: AppState) -> Router {
        Router::new().route("/query", get(handle)).with_state(state)
    }

    async fn seeded_store() -> InMemoryItemStore {
        let store = InMemoryItemStore::new();
        seed(
            &store,
            vec![
                make_item(1, "Odie", "animals", 5),
                make_item(2, "Garfield", "animals", 10),
                make_item(3, "Empire State Building", "buildings", 0),
            ],
        )
        .await;
        store
    }

    #[tokio::test]
    async fn it_should_return_the_category_ordered_by_likes() {
        let response = app(make_test_state(seeded_store().await))
            .oneshot(
                Request::get("/query?category=animals")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"id": 2, "name": "Garfield", "category": "animals", "likes": 10},
                {"id": 1, "name": "Odie", "category": "animals", "likes": 5}
            ])
        );
    }

    #[tokio::test]
    async fn it_should_return_an_empty_list_for_an_unknown_category() {
        let response = app(make_test_state(seeded_store().await))
            .oneshot(
                Request::get("/query?category=cars")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"[]");
    }

    #[tokio::test]
    async fn it_should_return_400_without_a_category() {
        let response = app(make_test_state(InMemoryItemStore::new()))
            .oneshot(Request::get("/query").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_return_500_when_the_store_is_offline() {
        let mut store = InMemoryItemStore::new();
        store.toggle_offline();

        let response = app(make_test_state(store))
            .oneshot(
                Request::get("/query?category=animals")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
