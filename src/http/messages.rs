//! Message operation HTTP handlers.

use axum::extract::State;
use axum::response::Json;

use crate::protocol::Message;

use super::types::{AckRequest, ApiResponse, AppState, PushRequest};

/// Enqueue a message.
pub async fn push_message(
    State(broker): State<AppState>,
    Json(req): Json<PushRequest>,
) -> Json<ApiResponse<()>> {
    match broker.push(&req.id, req.payload, req.priority, req.delay) {
        Ok(()) => ApiResponse::success(()),
        Err(e) => ApiResponse::error(e.to_string()),
    }
}

/// Dispense the next message. Blocks until one is available, so the wait
/// happens on the blocking pool rather than a runtime worker.
pub async fn pop_message(State(broker): State<AppState>) -> Json<ApiResponse<Message>> {
    match tokio::task::spawn_blocking(move || broker.pop()).await {
        Ok(Ok(msg)) => ApiResponse::success(msg),
        Ok(Err(e)) => ApiResponse::error(e.to_string()),
        Err(e) => ApiResponse::error(format!("pop worker failed: {e}")),
    }
}

/// Acknowledge completion or re-queue of a running message.
pub async fn ack_message(
    State(broker): State<AppState>,
    Json(req): Json<AckRequest>,
) -> Json<ApiResponse<()>> {
    match broker.ack(&req.id, req.token, req.requeue, req.delay) {
        Ok(()) => ApiResponse::success(()),
        Err(e) => ApiResponse::error(e.to_string()),
    }
}

/// Acknowledge one message and dispense the next in a single engine call.
pub async fn pop_ack_message(
    State(broker): State<AppState>,
    Json(req): Json<AckRequest>,
) -> Json<ApiResponse<Message>> {
    let result = tokio::task::spawn_blocking(move || {
        broker.pop_ack(&req.id, req.token, req.requeue, req.delay)
    })
    .await;
    match result {
        Ok(Ok(msg)) => ApiResponse::success(msg),
        Ok(Err(e)) => ApiResponse::error(e.to_string()),
        Err(e) => ApiResponse::error(format!("pop worker failed: {e}")),
    }
}
