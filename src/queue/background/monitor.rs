//! Ack-timeout enforcement and anti-starvation boosting.
//!
//! One pass per poll interval, entirely under the coordinator lock. Running
//! messages whose consumers overran the ack timeout are either re-queued
//! into their own priority FIFO or marked failed once retries are
//! exhausted. Queued messages stuck at priority > 0 past the boost timeout
//! move into priority 0.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::queue::broker::Shared;
use crate::queue::types::{now_ms, Handle, MessageStore, MsgState};

pub(crate) fn run(shared: Arc<Shared>) {
    let poll = Duration::from_millis(shared.config.poll_interval_ms.max(1));

    let mut state = shared.state.lock();
    while state.running {
        let _ = shared.monitor_cv.wait_for(&mut state, poll);
        if !state.running {
            return;
        }
        scan(&shared, &mut state);
    }
}

/// One monitor pass over every live record.
fn scan(shared: &Shared, state: &mut MessageStore) {
    let cfg = &shared.config;
    let now = now_ms();
    let fail_boundary = now.saturating_sub(cfg.ack_timeout_ms);
    let boost_boundary = now.saturating_sub(cfg.boost_timeout_ms);
    let mut requeued = 0usize;

    let handles: Vec<Handle> = state.index.values().copied().collect();
    for handle in handles {
        let rec = &state.slots[handle];
        let (rec_state, state_ts, priority, boosted) =
            (rec.state, rec.state_ts, rec.priority, rec.boosted);

        match rec_state {
            MsgState::Running if cfg.ack_timeout_ms > 0 && state_ts < fail_boundary => {
                let rec = &mut state.slots[handle];
                rec.fail_count += 1;
                rec.token = None;
                if rec.fail_count == cfg.max_retries {
                    rec.state = MsgState::Failed;
                    state.failed_count += 1;
                    debug!(
                        id = %state.slots[handle].id,
                        retries = cfg.max_retries,
                        "message failed after exhausting retries"
                    );
                } else {
                    rec.state = MsgState::Queued;
                    rec.state_ts = now;
                    rec.boosted = false;
                    state.ring[priority as usize].push_front(handle);
                    state.queued_count += 1;
                    requeued += 1;
                    debug!(
                        id = %state.slots[handle].id,
                        attempt = state.slots[handle].fail_count,
                        "ack timeout, message requeued"
                    );
                }
            }
            MsgState::Queued
                if priority > 0
                    && !boosted
                    && cfg.boost_timeout_ms > 0
                    && state_ts < boost_boundary =>
            {
                let pos = state.ring[priority as usize]
                    .iter()
                    .position(|&h| h == handle);
                match pos {
                    Some(pos) => {
                        state.ring[priority as usize].remove(pos);
                        state.slots[handle].boosted = true;
                        state.ring[0].push_front(handle);
                        debug!(
                            id = %state.slots[handle].id,
                            from = priority,
                            "starved message boosted to priority 0"
                        );
                    }
                    None => {
                        shared.report("queued message not found in its priority queue");
                    }
                }
            }
            _ => {}
        }
    }

    // Retries re-arm consumers: one waiter per message, everyone when the
    // pass re-queued several.
    if requeued == 1 {
        shared.pop_cv.notify_one();
    } else if requeued > 1 {
        shared.pop_cv.notify_all();
    }
}
