//! Introspection and failed-message administration.

use std::sync::Arc;

use compact_str::CompactString;

use crate::protocol::Counts;

use super::broker::Broker;
use super::types::MsgState;

impl Broker {
    pub fn capacity(&self) -> usize {
        self.shared.config.capacity
    }

    /// Occupancy snapshot: live non-failed records, failed records, and
    /// remaining push headroom.
    pub fn counts(&self) -> Counts {
        let state = self.shared.state.lock();
        Counts {
            active: state.index.len().saturating_sub(state.failed_count),
            failed: state.failed_count,
            free: self.shared.config.capacity.saturating_sub(state.index.len()),
        }
    }

    /// IDs of every message that exhausted its retries.
    pub fn failed(&self) -> Vec<CompactString> {
        let state = self.shared.state.lock();
        let mut failed = Vec::with_capacity(state.failed_count);
        for (id, &handle) in &state.index {
            if state.slots[handle].state == MsgState::Failed {
                failed.push(id.clone());
            }
        }
        failed
    }

    /// Remove failed messages, freeing their IDs and capacity slots.
    ///
    /// Returns the subset of `ids` that actually named a failed record; IDs
    /// that are absent or name a record in another state are skipped, so the
    /// call is idempotent and safe to retry.
    pub fn erase_failed<I, S>(&self, ids: I) -> Vec<CompactString>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.shared.state.lock();
        let mut erased = Vec::new();

        for id in ids {
            let id = id.as_ref();
            let Some(&handle) = state.index.get(id) else {
                continue;
            };
            if state.slots[handle].state != MsgState::Failed {
                continue;
            }
            if let Some((id, _)) = state.index.remove_entry(id) {
                state.release(handle);
                state.failed_count -= 1;
                erased.push(id);
            }
        }

        erased
    }

    /// Install or replace the invariant-violation callback. It runs while the
    /// coordinator lock is held and must not call back into the broker.
    pub fn set_error_callback(&self, callback: impl Fn(&str) + Send + Sync + 'static) {
        *self.shared.error_cb.write() = Some(Arc::new(callback));
    }
}
