//! Broker handle and coordinator state.
//!
//! One mutex guards every mutable field of the engine; three condition
//! variables share it. `pop_cv` parks consumers while nothing is queued,
//! `delay_cv` wakes the delay task when the earliest release time moves,
//! and `monitor_cv` exists so shutdown can interrupt the monitor's timed
//! wait. Keeping consumers off the two internal condvars avoids waking
//! every blocked `pop` on bookkeeping traffic.

use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex, RwLock};
use tracing::warn;

use super::background;
use super::types::MessageStore;

/// Callback for non-fatal internal invariant violations. Invoked while the
/// coordinator lock is held; it must not call back into the broker.
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Broker construction parameters. All durations are milliseconds and fixed
/// for the broker's lifetime.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Number of priority levels, 0 = highest. Must be at least 1.
    pub priority_count: u8,
    /// Maximum number of live records, failed records included.
    pub capacity: usize,
    /// Max consumer processing time before the monitor reclaims a message.
    /// 0 disables timeout-driven retries entirely.
    pub ack_timeout_ms: u64,
    /// Number of ack timeouts after which a message is marked failed instead
    /// of retried. 0 retries forever.
    pub max_retries: u32,
    /// How long a message may wait at priority > 0 before being boosted to
    /// the head of priority 0. 0 disables boosting.
    pub boost_timeout_ms: u64,
    /// Monitor scan period.
    pub poll_interval_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            priority_count: 3,
            capacity: 1024,
            ack_timeout_ms: 30_000,
            max_retries: 3,
            boost_timeout_ms: 60_000,
            poll_interval_ms: 1_000,
        }
    }
}

impl BrokerConfig {
    /// Read configuration from environment variables, falling back to
    /// defaults field by field.
    pub fn from_env() -> Self {
        fn var<T: std::str::FromStr>(name: &str, default: T) -> T {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        Self {
            priority_count: var("QUEUE_PRIORITIES", defaults.priority_count),
            capacity: var("QUEUE_CAPACITY", defaults.capacity),
            ack_timeout_ms: var("ACK_TIMEOUT_MS", defaults.ack_timeout_ms),
            max_retries: var("MAX_RETRIES", defaults.max_retries),
            boost_timeout_ms: var("BOOST_TIMEOUT_MS", defaults.boost_timeout_ms),
            poll_interval_ms: var("MONITOR_INTERVAL_MS", defaults.poll_interval_ms),
        }
    }
}

/// State shared between caller threads and the two background threads.
pub(crate) struct Shared {
    pub config: BrokerConfig,
    pub state: Mutex<MessageStore>,
    /// Consumers park here while `queued_count == 0`.
    pub pop_cv: Condvar,
    /// Shutdown interrupt for the monitor's poll-interval wait.
    pub monitor_cv: Condvar,
    /// Wakes the delay task when the delay-set head changes or on shutdown.
    pub delay_cv: Condvar,
    pub error_cb: RwLock<Option<ErrorCallback>>,
}

impl Shared {
    /// Report a tolerated internal inconsistency. Runs under the coordinator
    /// lock.
    pub fn report(&self, msg: &str) {
        warn!(message = msg, "broker invariant violation");
        if let Some(cb) = self.error_cb.read().as_ref() {
            cb(msg);
        }
    }
}

/// In-process multi-priority message broker with monitored at-least-once
/// delivery.
///
/// A `Broker` owns its two background threads (ack-timeout monitor and
/// delayed-message release). Dropping the broker shuts it down and joins
/// them; consumers blocked in [`pop`](Broker::pop) drain with
/// [`QueueError::Shutdown`](super::QueueError::Shutdown). Share the handle
/// between producer and consumer threads with `Arc`.
pub struct Broker {
    pub(crate) shared: Arc<Shared>,
    monitor: Option<thread::JoinHandle<()>>,
    delay: Option<thread::JoinHandle<()>>,
}

impl Broker {
    pub fn new(config: BrokerConfig) -> Self {
        Self::create(config, None)
    }

    /// Construct with an error callback installed before the background
    /// threads start.
    pub fn with_error_callback(
        config: BrokerConfig,
        callback: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        Self::create(config, Some(Arc::new(callback)))
    }

    fn create(config: BrokerConfig, callback: Option<ErrorCallback>) -> Self {
        let store = MessageStore::new(config.priority_count);
        let shared = Arc::new(Shared {
            config,
            state: Mutex::new(store),
            pop_cv: Condvar::new(),
            monitor_cv: Condvar::new(),
            delay_cv: Condvar::new(),
            error_cb: RwLock::new(callback),
        });

        let monitor = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("vigilq-monitor".into())
                .spawn(move || background::monitor::run(shared))
                .expect("failed to spawn monitor thread")
        };
        let delay = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("vigilq-delay".into())
                .spawn(move || background::delay::run(shared))
                .expect("failed to spawn delay thread")
        };

        Self {
            shared,
            monitor: Some(monitor),
            delay: Some(delay),
        }
    }

    /// Stop the broker. Background threads exit, blocked pops return
    /// [`QueueError::Shutdown`](super::QueueError::Shutdown), and every
    /// subsequent pop does the same. Idempotent.
    pub fn shutdown(&self) {
        {
            let mut state = self.shared.state.lock();
            if !state.running {
                return;
            }
            state.running = false;
        }
        self.shared.monitor_cv.notify_all();
        self.shared.delay_cv.notify_all();
        self.shared.pop_cv.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        !self.shared.state.lock().running
    }
}

impl Drop for Broker {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.monitor.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.delay.take() {
            let _ = handle.join();
        }
    }
}
