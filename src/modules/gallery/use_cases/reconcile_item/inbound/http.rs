use axum::{body::Bytes, extract::State, http::StatusCode};

use crate::modules::gallery::use_cases::reconcile_item::lane::LaneSender;
use crate::shell::state::AppState;

// Payloads are enqueued as they arrive. Validation is the lane's job, so a
// malformed body is still accepted here and ends up as a dead letter.

pub async fn publish_photo(State(state): State<AppState>, body: Bytes) -> StatusCode {
    enqueue(&state.photos, body).await
}

pub async fn publish_likes(State(state): State<AppState>, body: Bytes) -> StatusCode {
    enqueue(&state.likes, body).await
}

async fn enqueue(lane: &LaneSender, body: Bytes) -> StatusCode {
    match lane.send(body.to_vec()).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(_) => {
            tracing::warn!("lane closed, rejecting event");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
