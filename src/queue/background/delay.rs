//! Release of delayed messages at their scheduled times.
//!
//! Sleeps until the earliest release time (or indefinitely while the delay
//! set is empty); a push that changes the set's head re-aims the wait.
//! Released messages enter their priority FIFO at the back, unlike every
//! other enqueue path.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::queue::broker::Shared;
use crate::queue::types::{now_ms, MessageStore, MsgState};

pub(crate) fn run(shared: Arc<Shared>) {
    let mut state = shared.state.lock();
    while state.running {
        match state.delayed.iter().next().copied() {
            Some((due, _)) => {
                let now = now_ms();
                if due > now {
                    let _ = shared
                        .delay_cv
                        .wait_for(&mut state, Duration::from_millis(due - now));
                }
            }
            None => shared.delay_cv.wait(&mut state),
        }

        if !state.running {
            return;
        }
        release_due(&shared, &mut state);
    }
}

/// Move every record whose release time has passed into its priority FIFO.
fn release_due(shared: &Shared, state: &mut MessageStore) {
    let now = now_ms();
    while let Some(&(due, handle)) = state.delayed.iter().next() {
        if due > now {
            break;
        }
        state.delayed.remove(&(due, handle));

        let priority = {
            let rec = &mut state.slots[handle];
            rec.state = MsgState::Queued;
            rec.state_ts = now;
            rec.priority as usize
        };
        state.ring[priority].push_back(handle);
        state.queued_count += 1;
        shared.pop_cv.notify_one();
        debug!(id = %state.slots[handle].id, "delayed message released");
    }
}
