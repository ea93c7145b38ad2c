use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use gallery_query::modules::gallery::adapters::outbound::item_store_in_memory::InMemoryItemStore;
use gallery_query::shell::config::AppConfig;
use gallery_query::shell::state::AppState;
use gallery_query::shell::workers::{drain_dead_letters, spawn_lanes};
use gallery_query::shell::{graphql, http};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env()?;
    tracing::info!(?config, "starting gallery query service");

    // In-memory store for now
    let store = Arc::new(InMemoryItemStore::new());
    let workers = spawn_lanes(store.clone(), config.retry_strategy(), config.lane_capacity);
    tokio::spawn(drain_dead_letters(workers.dead_letters));

    let state = AppState {
        queries: store,
        photos: workers.photos,
        likes: workers.likes,
    };

    let app = http::router(state.clone())
        .merge(graphql::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!(
        "listing endpoint: http://{}/query?category=",
        config.http_addr
    );
    tracing::info!("GraphQL endpoint: http://{}/gql", config.http_addr);
    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
