//! Broker error taxonomy.

use compact_str::CompactString;
use thiserror::Error;

/// Errors surfaced synchronously by broker operations.
///
/// The ack-path variants are checked in a fixed order: `NoSuchMessage`, then
/// `InvalidToken`, then `InvalidState`. A consumer that receives any of the
/// three has diverged from the broker (typically because the monitor already
/// re-dispensed its message); it must discard partial work and resume by
/// popping, never retry with the same token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Producer supplied a priority outside `0..priority_count`.
    #[error("invalid message priority {priority}, broker has {count} levels")]
    InvalidPriority { priority: u8, count: u8 },

    /// A live record (queued, running, delayed, or failed) already owns this
    /// ID.
    #[error("duplicate message id '{0}'")]
    DuplicateId(CompactString),

    /// The broker holds `capacity` live records. Failed records count toward
    /// capacity until erased.
    #[error("queue capacity exceeded")]
    CapacityExceeded,

    #[error("no message found matching id '{0}'")]
    NoSuchMessage(CompactString),

    /// The supplied token does not match the record's current token; another
    /// consumer owns the message now.
    #[error("invalid message token")]
    InvalidToken,

    /// The record is not running.
    #[error("invalid message state")]
    InvalidState,

    /// The broker is shutting down; blocked pops drain with this error.
    #[error("broker is shut down")]
    Shutdown,
}
