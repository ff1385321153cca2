//! Broker engine - multi-priority queueing with monitored delivery.
//!
//! ## Module Organization
//!
//! - `broker.rs` - Broker handle, config, coordinator lock and condvars
//! - `types/` - arena records, lock-guarded store, clock helpers
//! - `background/` - monitor (ack timeout, boosting) and delay threads
//!
//! ### Core operations
//!
//! - `push.rs` - Push with optional enqueue delay
//! - `pop.rs` - Blocking pop and the combined pop_ack
//! - `ack.rs` - Completion and re-queue acknowledgement
//! - `admin.rs` - Counts, failed listing/erasure, error callback

mod ack;
mod admin;
mod background;
mod broker;
mod error;
mod pop;
mod push;
pub(crate) mod types;

#[cfg(test)]
mod tests;

pub use broker::{Broker, BrokerConfig, ErrorCallback};
pub use error::QueueError;
pub use types::now_ms;
