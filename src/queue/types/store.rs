//! Coordinator-guarded state: arena, free pool, ID index, priority ring,
//! delay set, and counters.
//!
//! Everything here is mutated only while the broker's single mutex is held,
//! so the struct exposes plain fields to the operation modules and keeps
//! only the allocation and bookkeeping helpers as methods.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use compact_str::CompactString;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rustc_hash::FxHashMap;
use serde_json::Value;

use super::record::{Handle, MsgRecord, MsgState};

/// Mutable broker state behind the coordinator lock.
pub(crate) struct MessageStore {
    /// Record arena. Slots are never deallocated; retired slots are recycled
    /// through `pool`.
    pub slots: Vec<MsgRecord>,
    /// LIFO reservoir of free slot handles.
    pub pool: Vec<Handle>,
    /// Message ID -> slot handle, one entry per live record.
    pub index: FxHashMap<CompactString, Handle>,
    /// Per-priority FIFOs, 0 = highest. Insertion at the front, removal at
    /// the back.
    pub ring: Vec<VecDeque<Handle>>,
    /// Delayed records ordered by (release time, handle).
    pub delayed: BTreeSet<(u64, Handle)>,
    /// Must equal the sum of ring lengths.
    pub queued_count: usize,
    /// Must equal the number of `Failed` records in the index.
    pub failed_count: usize,
    /// Cleared on shutdown, under the lock, before the wake broadcasts.
    pub running: bool,
    /// Per-broker token source.
    rng: StdRng,
}

impl MessageStore {
    pub fn new(priority_count: u8) -> Self {
        Self {
            slots: Vec::new(),
            pool: Vec::new(),
            index: FxHashMap::default(),
            ring: (0..priority_count).map(|_| VecDeque::new()).collect(),
            delayed: BTreeSet::new(),
            queued_count: 0,
            failed_count: 0,
            running: true,
            rng: StdRng::from_entropy(),
        }
    }

    /// Obtain a record slot for a new message, preferring the pool over
    /// growing the arena. The returned record is in `Queued` state with
    /// `state_ts = now`; the caller places it and registers the ID.
    pub fn alloc(
        &mut self,
        id: CompactString,
        payload: Option<Arc<Value>>,
        priority: u8,
        now: u64,
    ) -> Handle {
        match self.pool.pop() {
            Some(handle) => {
                self.slots[handle].reset(id, payload, priority, now);
                handle
            }
            None => {
                self.slots.push(MsgRecord::new(id, payload, priority, now));
                self.slots.len() - 1
            }
        }
    }

    /// Retire a slot back into the pool. The caller must already have removed
    /// the record from the index and from any container.
    pub fn release(&mut self, handle: Handle) {
        self.slots[handle].clear();
        self.pool.push(handle);
    }

    /// Fresh per-handoff token. Uniform 64-bit; compared by value on ack.
    pub fn next_token(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Move a record into the delay set with the given release time. Returns
    /// true when the record became the new earliest entry, in which case the
    /// caller must wake the delay task.
    pub fn schedule_delayed(&mut self, handle: Handle, release_at: u64) -> bool {
        let rec = &mut self.slots[handle];
        rec.state = MsgState::Delayed;
        rec.state_ts = release_at;
        self.delayed.insert((release_at, handle));
        self.delayed.iter().next() == Some(&(release_at, handle))
    }

    /// Actual number of queued handles across all priority FIFOs. Used to
    /// repair `queued_count` if it ever disagrees.
    pub fn ring_len(&self) -> usize {
        self.ring.iter().map(VecDeque::len).sum()
    }
}
