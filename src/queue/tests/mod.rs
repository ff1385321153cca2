//! Broker engine tests.
//!
//! Split by area, mirroring the operation modules. Timing-sensitive tests
//! (monitor retries, boosting, delayed release) use short broker timeouts
//! and generous sleep margins so they stay stable on loaded machines.


use std::time::Duration;

use super::types::MsgState;
use super::{Broker, BrokerConfig, QueueError};

/// Config with both background behaviors disabled: no ack timeout, no
/// boosting. Tests that want the monitor involved build their own config.
fn quiet_config() -> BrokerConfig {
    BrokerConfig {
        priority_count: 3,
        capacity: 16,
        ack_timeout_ms: 0,
        max_retries: 3,
        boost_timeout_ms: 0,
        poll_interval_ms: 10,
    }
}

fn sleep_ms(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}

/// Check the membership and counter invariants that must hold between API
/// calls: every live record sits in the container its state claims, the
/// queued/failed counters match reality, capacity is respected, and pooled
/// slots are not reachable through the index.
fn assert_invariants(broker: &Broker) {
    let state = broker.shared.state.lock();

    assert_eq!(state.queued_count, state.ring_len(), "queued_count vs ring");
    let failed = state
        .index
        .values()
        .filter(|&&h| state.slots[h].state == MsgState::Failed)
        .count();
    assert_eq!(state.failed_count, failed, "failed_count vs records");
    assert!(state.index.len() <= broker.capacity(), "capacity bound");

    for (id, &handle) in &state.index {
        let rec = &state.slots[handle];
        assert_eq!(&rec.id, id, "index key vs record id");

        let ring_hits: usize = state
            .ring
            .iter()
            .map(|fifo| fifo.iter().filter(|&&h| h == handle).count())
            .sum();
        let delay_hits = state.delayed.iter().filter(|&&(_, h)| h == handle).count();

        match rec.state {
            MsgState::Queued => {
                assert_eq!(ring_hits, 1, "queued record in exactly one FIFO");
                assert_eq!(delay_hits, 0);
                assert!(rec.token.is_none());
                let expected = if rec.boosted { 0 } else { rec.priority as usize };
                assert!(
                    state.ring[expected].contains(&handle),
                    "queued record in the FIFO its priority/boost selects"
                );
            }
            MsgState::Delayed => {
                assert_eq!(ring_hits, 0);
                assert_eq!(delay_hits, 1, "delayed record in the delay set");
                assert!(rec.token.is_none());
            }
            MsgState::Running => {
                assert_eq!(ring_hits, 0);
                assert_eq!(delay_hits, 0);
                assert!(rec.token.is_some(), "running record holds a token");
            }
            MsgState::Failed => {
                assert_eq!(ring_hits, 0);
                assert_eq!(delay_hits, 0);
                assert!(rec.token.is_none(), "failed record holds no token");
            }
        }
    }

    for &handle in &state.pool {
        assert!(
            state.index.values().all(|&h| h != handle),
            "pooled slot not reachable through the index"
        );
    }
}
