//! HTTP API request and response types.

use std::sync::Arc;

use axum::Json;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::queue::Broker;

/// Shared application state.
pub type AppState = Arc<Broker>;

/// Push message request.
#[derive(Deserialize)]
pub struct PushRequest {
    pub id: String,
    #[serde(default)]
    pub priority: u8,
    /// Enqueue delay in milliseconds; 0 queues immediately.
    #[serde(default)]
    pub delay: u64,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// Acknowledge message request, shared by /ack and /pop_ack.
#[derive(Deserialize)]
pub struct AckRequest {
    pub id: String,
    pub token: u64,
    #[serde(default)]
    pub requeue: bool,
    /// Re-queue delay in milliseconds; only meaningful with `requeue`.
    #[serde(default)]
    pub delay: u64,
}

/// Erase failed messages request.
#[derive(Deserialize)]
pub struct EraseRequest {
    pub ids: Vec<CompactString>,
}

/// Count response.
#[derive(Serialize)]
pub struct CountResponse {
    pub active: usize,
    pub failed: usize,
    pub free: usize,
    pub capacity: usize,
}

/// Generic API response wrapper.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            ok: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn error(msg: impl Into<String>) -> Json<Self> {
        Json(Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        })
    }
}
