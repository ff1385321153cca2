//! Acknowledgement: completion, re-queue, and re-delay of running messages.

use compact_str::CompactString;
use parking_lot::MutexGuard;

use super::broker::Broker;
use super::error::QueueError;
use super::types::{now_ms, MessageStore, MsgState};

impl Broker {
    /// Complete or return a running message.
    ///
    /// `requeue == false` removes the message for good. `requeue == true`
    /// puts it back at the front of its own priority FIFO (or into the delay
    /// set when `delay_ms > 0`), clearing the boost it may have earned.
    ///
    /// Errors are checked in a fixed order: [`QueueError::NoSuchMessage`],
    /// [`QueueError::InvalidToken`], [`QueueError::InvalidState`]. The token
    /// comparison is what fences off a consumer that overran the ack timeout
    /// after the monitor re-dispensed its message.
    pub fn ack(&self, id: &str, token: u64, requeue: bool, delay_ms: u64) -> Result<(), QueueError> {
        let mut state = self.shared.state.lock();
        self.ack_locked(&mut state, id, token, requeue, delay_ms)
    }

    pub(crate) fn ack_locked(
        &self,
        state: &mut MutexGuard<'_, MessageStore>,
        id: &str,
        token: u64,
        requeue: bool,
        delay_ms: u64,
    ) -> Result<(), QueueError> {
        let handle = *state
            .index
            .get(id)
            .ok_or_else(|| QueueError::NoSuchMessage(CompactString::from(id)))?;

        let rec = &state.slots[handle];
        if rec.token != Some(token) {
            return Err(QueueError::InvalidToken);
        }
        if rec.state != MsgState::Running {
            return Err(QueueError::InvalidState);
        }

        if !requeue {
            state.index.remove(id);
            state.release(handle);
            return Ok(());
        }

        let now = now_ms();
        {
            let rec = &mut state.slots[handle];
            rec.boosted = false;
            rec.token = None;
        }

        if delay_ms > 0 {
            if state.schedule_delayed(handle, now + delay_ms) {
                self.shared.delay_cv.notify_one();
            }
        } else {
            let priority = {
                let rec = &mut state.slots[handle];
                rec.state = MsgState::Queued;
                rec.state_ts = now;
                rec.priority as usize
            };
            state.ring[priority].push_front(handle);
            state.queued_count += 1;
            self.shared.pop_cv.notify_one();
        }

        Ok(())
    }
}
