//! HTTP API module.
//!
//! Maps the broker's public operations 1:1 onto a JSON REST surface.

mod admin;
mod messages;
mod types;

#[cfg(test)]
mod tests;

use axum::routing::{get, post};
use axum::Router;

pub use types::AppState;

/// Create the HTTP router with all API routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/push", post(messages::push_message))
        .route("/pop", post(messages::pop_message))
        .route("/ack", post(messages::ack_message))
        .route("/pop_ack", post(messages::pop_ack_message))
        .route("/count", get(admin::get_count))
        .route("/failed", get(admin::get_failed))
        .route("/failed/erase", post(admin::erase_failed))
        .route("/ping", post(admin::ping))
        .with_state(state)
}
