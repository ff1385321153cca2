//! Type definitions for the broker engine.
//!
//! - `record.rs` - arena records and the per-message state machine
//! - `store.rs` - lock-guarded state: arena, pool, index, ring, delay set
//! - `time.rs` - millisecond clock

pub(crate) mod record;
pub(crate) mod store;
mod time;

pub(crate) use record::{Handle, MsgState};
pub(crate) use store::MessageStore;
pub use time::now_ms;
