use crate::modules::gallery::adapters::outbound::item_store_in_memory::InMemoryItemStore;
use crate::modules::gallery::core::item::QueryItem;
use crate::shared::infrastructure::retry::FixedDelay;
use crate::shell::http::router;
use crate::shell::state::AppState;
use crate::shell::workers::{Workers, spawn_lanes};
use crate::tests::fixtures::items::make_item;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn start(store: Arc<InMemoryItemStore>) -> (Router, Workers) {
    let workers = spawn_lanes(
        store.clone(),
        FixedDelay::forever(Duration::from_millis(5)),
        16,
    );
    let app = router(AppState {
        queries: store,
        photos: workers.photos.clone(),
        likes: workers.likes.clone(),
    });
    (app, workers)
}

async fn publish(app: &Router, topic: &str, body: &'static str) {
    let response = app
        .clone()
        .oneshot(
            Request::post(format!("/{topic}"))
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

async fn list(app: &Router, category: &str) -> Vec<QueryItem> {
    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/query?category={category}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll the store until `done` holds, for at most five seconds.
async fn settle(store: &InMemoryItemStore, done: impl Fn(&[QueryItem]) -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done(store.rows().await.as_slice()) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("store did not settle in time");
}

/// Poll the store until its first row equals `expected`.
async fn settle_on(store: &InMemoryItemStore, expected: QueryItem) {
    settle(store, |rows| rows.first() == Some(&expected)).await;
}

const CALINOU: &str = r#"{"id":1,"name":"Calinou","category":"animals"}"#;
const GARFIELD: &str = r#"{"id":7,"name":"Garfield","category":"animals"}"#;
const ODIE: &str = r#"{"id":2,"name":"Odie","category":"animals"}"#;

#[tokio::test]
async fn reconciles_a_photo_with_its_likes() {
    let store = Arc::new(InMemoryItemStore::new());
    let (app, _workers) = start(store.clone());

    publish(&app, "photos", CALINOU).await;
    settle_on(&store, make_item(1, "Calinou", "animals", 0)).await;

    publish(&app, "likes", r#"{"id":1,"likes":10}"#).await;
    settle_on(&store, make_item(1, "Calinou", "animals", 10)).await;

    assert_eq!(store.rows().await.len(), 1);
    assert_eq!(
        list(&app, "animals").await,
        vec![make_item(1, "Calinou", "animals", 10)]
    );
}

#[tokio::test]
async fn exposes_likes_before_the_photo_has_arrived() {
    let store = Arc::new(InMemoryItemStore::new());
    let (app, _workers) = start(store.clone());

    publish(&app, "likes", r#"{"id":1,"likes":10}"#).await;
    let liked = QueryItem {
        likes: 10,
        ..QueryItem::new(1)
    };
    settle_on(&store, liked.clone()).await;

    assert_eq!(store.rows().await, vec![liked]);
    assert!(list(&app, "animals").await.is_empty());
}

#[tokio::test]
async fn converges_when_both_lanes_race_to_create_the_same_item() {
    let store = Arc::new(InMemoryItemStore::new());
    store.set_delay_commit_ms(20);
    let (app, _workers) = start(store.clone());

    publish(&app, "photos", GARFIELD).await;
    publish(&app, "likes", r#"{"id":7,"likes":10}"#).await;
    let garfield = make_item(7, "Garfield", "animals", 10);
    settle_on(&store, garfield.clone()).await;

    assert_eq!(store.rows().await, vec![garfield]);
    assert_eq!(store.rejected_commits(), 1);
}

#[tokio::test]
async fn keeps_the_lane_moving_after_a_malformed_event() {
    let store = Arc::new(InMemoryItemStore::new());
    let (app, mut workers) = start(store.clone());

    publish(&app, "photos", r#"{"id":"not-a-number"}"#).await;
    publish(&app, "photos", ODIE).await;
    settle(&store, |rows| rows.len() == 1).await;

    let letter = workers.dead_letters.recv().await.unwrap();
    assert_eq!(letter.lane, "photos");
    assert_eq!(letter.payload, br#"{"id":"not-a-number"}"#);
    assert_eq!(
        list(&app, "animals").await,
        vec![make_item(2, "Odie", "animals", 0)]
    );
}

#[tokio::test]
async fn keeps_retrying_a_conflicting_event_until_it_commits() {
    let store = Arc::new(InMemoryItemStore::new());
    store.fail_next_commits(4);
    let (app, _workers) = start(store.clone());

    publish(&app, "likes", r#"{"id":3,"likes":1}"#).await;
    publish(&app, "likes", r#"{"id":3,"likes":2}"#).await;
    let two_likes = QueryItem {
        likes: 2,
        ..QueryItem::new(3)
    };
    settle_on(&store, two_likes).await;

    assert_eq!(store.rejected_commits(), 4);
    assert_eq!(store.committed_transactions(), 2);
}
