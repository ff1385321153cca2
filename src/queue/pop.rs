//! Pop operations for dispensing messages to consumers.

use parking_lot::MutexGuard;

use crate::protocol::Message;

use super::broker::Broker;
use super::error::QueueError;
use super::types::{now_ms, MessageStore, MsgState};

impl Broker {
    /// Block until a message is available, then dispense the oldest message
    /// of the highest non-empty priority.
    ///
    /// The returned token is fresh for this handoff and required by
    /// [`ack`](Broker::ack). Returns [`QueueError::Shutdown`] once the broker
    /// stops, including for consumers already parked inside the call.
    pub fn pop(&self) -> Result<Message, QueueError> {
        let mut state = self.shared.state.lock();
        self.pop_locked(&mut state)
    }

    /// Acknowledge one message and dispense the next under a single lock
    /// acquisition.
    ///
    /// Equivalent to [`ack`](Broker::ack) followed by [`pop`](Broker::pop)
    /// but saves a lock round-trip per consumer loop iteration. On an ack
    /// error the pop is not attempted.
    pub fn pop_ack(
        &self,
        id: &str,
        token: u64,
        requeue: bool,
        delay_ms: u64,
    ) -> Result<Message, QueueError> {
        let mut state = self.shared.state.lock();
        self.ack_locked(&mut state, id, token, requeue, delay_ms)?;
        self.pop_locked(&mut state)
    }

    pub(crate) fn pop_locked(
        &self,
        state: &mut MutexGuard<'_, MessageStore>,
    ) -> Result<Message, QueueError> {
        loop {
            if !state.running {
                return Err(QueueError::Shutdown);
            }
            if state.queued_count == 0 {
                self.shared.pop_cv.wait(state);
                continue;
            }

            // Highest priority first; FIFOs are fed at the front and drained
            // from the back.
            let handle = state
                .ring
                .iter_mut()
                .find(|fifo| !fifo.is_empty())
                .and_then(|fifo| fifo.pop_back());

            let Some(handle) = handle else {
                // queued_count claims messages the ring does not have. Repair
                // the counter and keep waiting rather than spinning on it.
                self.shared
                    .report("queued count out of sync with priority ring");
                state.queued_count = state.ring_len();
                continue;
            };

            state.queued_count -= 1;
            let token = state.next_token();
            let rec = &mut state.slots[handle];
            rec.state = MsgState::Running;
            rec.state_ts = now_ms();
            rec.token = Some(token);

            return Ok(Message {
                id: rec.id.clone(),
                token,
                payload: rec.payload.clone(),
            });
        }
    }
}
