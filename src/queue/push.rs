//! Push operation for adding messages to the broker.

use std::sync::Arc;

use compact_str::CompactString;
use serde_json::Value;

use super::broker::Broker;
use super::error::QueueError;
use super::types::now_ms;

impl Broker {
    /// Enqueue a message under a caller-chosen unique ID.
    ///
    /// With `delay_ms == 0` the message becomes immediately poppable at
    /// `priority` (0 = highest). With `delay_ms > 0` it stays invisible until
    /// `now + delay_ms`, then enters its priority FIFO.
    ///
    /// Failed records hold their IDs and capacity slots until erased, so a
    /// push can fail with [`QueueError::DuplicateId`] or
    /// [`QueueError::CapacityExceeded`] on their account.
    pub fn push(
        &self,
        id: &str,
        payload: Option<Value>,
        priority: u8,
        delay_ms: u64,
    ) -> Result<(), QueueError> {
        let count = self.shared.config.priority_count;
        if priority >= count {
            return Err(QueueError::InvalidPriority { priority, count });
        }

        let payload = payload.map(Arc::new);
        let mut state = self.shared.state.lock();

        if state.index.contains_key(id) {
            return Err(QueueError::DuplicateId(CompactString::from(id)));
        }
        if state.index.len() == self.shared.config.capacity {
            return Err(QueueError::CapacityExceeded);
        }

        let now = now_ms();
        let id = CompactString::from(id);
        let handle = state.alloc(id.clone(), payload, priority, now);
        state.index.insert(id, handle);

        if delay_ms == 0 {
            state.ring[priority as usize].push_front(handle);
            state.queued_count += 1;
            self.shared.pop_cv.notify_one();
        } else if state.schedule_delayed(handle, now + delay_ms) {
            self.shared.delay_cv.notify_one();
        }

        Ok(())
    }
}
