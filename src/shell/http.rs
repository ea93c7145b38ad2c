use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::gallery::use_cases::list_items_by_category::inbound::http as list_http;
use crate::modules::gallery::use_cases::reconcile_item::inbound::http as reconcile_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/query", get(list_http::handle))
        .route("/photos", post(reconcile_http::publish_photo))
        .route("/likes", post(reconcile_http::publish_likes))
        .with_state(state)
}
