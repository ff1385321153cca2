//! Message records stored in the broker arena.

use std::sync::Arc;

use compact_str::CompactString;
use serde_json::Value;

/// Stable index of a record slot in the arena. Handles stay valid for the
/// whole life of the broker; slot reuse is mediated by the free pool.
pub(crate) type Handle = usize;

/// Where a live record currently sits.
///
/// The variant must always agree with container membership: `Queued` records
/// sit in exactly one priority FIFO, `Delayed` records in the delay set,
/// `Running` and `Failed` records in the ID index only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MsgState {
    Queued,
    Running,
    Delayed,
    Failed,
}

/// Per-message metadata. One slot per live message plus however many free
/// slots the pool has accumulated; free slots keep their last contents until
/// `reset` overwrites them.
#[derive(Debug)]
pub(crate) struct MsgRecord {
    pub id: CompactString,
    pub payload: Option<Arc<Value>>,
    /// Priority level, 0 = highest. Fixed for the record's lifetime; boosting
    /// relocates the record without rewriting this field.
    pub priority: u8,
    pub state: MsgState,
    /// Meaning depends on `state`: last enqueue time while `Queued`, dispense
    /// time while `Running`, scheduled release time while `Delayed`.
    pub state_ts: u64,
    /// Number of ack-timeout expiries suffered so far.
    pub fail_count: u32,
    /// Set when the monitor promoted this record to priority 0; cleared by
    /// any re-queue.
    pub boosted: bool,
    /// Present exactly while `Running`; the consumer must echo it to ack.
    pub token: Option<u64>,
}

impl MsgRecord {
    pub fn new(id: CompactString, payload: Option<Arc<Value>>, priority: u8, now: u64) -> Self {
        Self {
            id,
            payload,
            priority,
            state: MsgState::Queued,
            state_ts: now,
            fail_count: 0,
            boosted: false,
            token: None,
        }
    }

    /// Re-initialize a pooled slot for a fresh message.
    pub fn reset(&mut self, id: CompactString, payload: Option<Arc<Value>>, priority: u8, now: u64) {
        self.id = id;
        self.payload = payload;
        self.priority = priority;
        self.state = MsgState::Queued;
        self.state_ts = now;
        self.fail_count = 0;
        self.boosted = false;
        self.token = None;
    }

    /// Drop everything a retired slot should not keep alive while parked in
    /// the pool.
    pub fn clear(&mut self) {
        self.id.clear();
        self.payload = None;
        self.token = None;
    }
}
