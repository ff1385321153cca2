//! Introspection and administration HTTP handlers.

use axum::extract::State;
use axum::response::Json;
use compact_str::CompactString;

use super::types::{ApiResponse, AppState, CountResponse, EraseRequest};

/// Broker occupancy counters.
pub async fn get_count(State(broker): State<AppState>) -> Json<ApiResponse<CountResponse>> {
    let counts = broker.counts();
    ApiResponse::success(CountResponse {
        active: counts.active,
        failed: counts.failed,
        free: counts.free,
        capacity: broker.capacity(),
    })
}

/// IDs of all failed messages.
pub async fn get_failed(State(broker): State<AppState>) -> Json<ApiResponse<Vec<CompactString>>> {
    ApiResponse::success(broker.failed())
}

/// Erase failed messages; replies with the IDs actually erased.
pub async fn erase_failed(
    State(broker): State<AppState>,
    Json(req): Json<EraseRequest>,
) -> Json<ApiResponse<Vec<CompactString>>> {
    ApiResponse::success(broker.erase_failed(req.ids))
}

/// Liveness probe.
pub async fn ping() -> Json<ApiResponse<&'static str>> {
    ApiResponse::success("pong")
}
