//! Wire-facing types shared by the engine and its embeddings.

use std::sync::Arc;

use compact_str::CompactString;
use serde::Serialize;
use serde_json::Value;

/// A dispensed message, immutable for the duration of consumer ownership.
///
/// The token binds this handoff to the consumer that received it; every ack
/// must echo it. Payloads are producer-supplied and never interpreted by the
/// broker; the `Arc` makes the view cheap to clone out of the engine.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: CompactString,
    pub token: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Arc<Value>>,
}

/// Broker occupancy snapshot.
///
/// `active` counts queued, running, and delayed records; `failed` records
/// are retained (and keep consuming capacity) until erased; `free` is the
/// remaining push headroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub active: usize,
    pub failed: usize,
    pub free: usize,
}
