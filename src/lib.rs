//! vigilq - in-process multi-priority message broker with monitored
//! at-least-once delivery.
//!
//! This library exposes the broker engine for embedding, plus the HTTP
//! front-end used by the server binary.

pub mod http;
pub mod protocol;
pub mod queue;
pub mod telemetry;
