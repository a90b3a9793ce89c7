//! Polling views
//!
//! A [`PollingView`] runs one background task per mounted key: an initial
//! full fetch followed by fixed-interval polls. Results land in a bounded
//! [`SlidingWindow`]. A steady-state poll that outlives
//! [`PollingConfig::poll_timeout`] is dropped like any other failed poll.
//! Mounting a new key aborts the running task before
//! the new one is spawned, and every write is fenced by the slot
//! generation, so a superseded task can never touch newer state.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use horizon_core::SlidingWindow;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Result of one steady-state poll
#[derive(Debug, Clone, PartialEq)]
pub enum PollUpdate<T> {
    /// Push one item as newest
    Append(T),
    /// Replace the whole window (full fetch)
    Replace(Vec<T>),
    /// Nothing new
    Nothing,
}

/// Data source behind a polling view
#[async_trait]
pub trait PollSource: Send + Sync + 'static {
    /// Input that selects what is polled (e.g. a machine id)
    type Key: Clone + Debug + PartialEq + Send + Sync + 'static;
    type Item: Clone + Send + Sync + 'static;

    /// Full fetch on mount
    async fn initial(&self, key: &Self::Key) -> Result<Vec<Self::Item>, ApiError>;

    /// Lightweight fetch on every tick
    async fn poll(&self, key: &Self::Key) -> Result<PollUpdate<Self::Item>, ApiError>;
}

/// Intervals a steady-state poll may take before it is abandoned
pub const POLL_TIMEOUT_INTERVALS: u32 = 5;

/// Interval and window size of a polling view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    pub interval: Duration,
    pub capacity: usize,
    /// Upper bound on one steady-state poll; the initial load is unbounded
    pub poll_timeout: Duration,
}

impl PollingConfig {
    pub fn new(interval: Duration, capacity: usize) -> Self {
        Self {
            interval,
            capacity,
            poll_timeout: interval * POLL_TIMEOUT_INTERVALS,
        }
    }

    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }
}

/// Snapshot of a polling view
#[derive(Debug, Clone)]
pub struct ViewState<K, T> {
    pub key: Option<K>,
    pub items: SlidingWindow<T>,
    pub is_loading: bool,
    /// Initial-load error, or an expired session seen while polling
    pub error: Option<ApiError>,
    /// Successful polls applied since mount
    pub updates: u64,
}

impl<K, T> ViewState<K, T> {
    fn new(capacity: usize) -> Self {
        Self {
            key: None,
            items: SlidingWindow::new(capacity),
            is_loading: false,
            error: None,
            updates: 0,
        }
    }

    fn apply(&mut self, update: PollUpdate<T>) {
        match update {
            PollUpdate::Append(item) => {
                self.items.push(item);
            }
            PollUpdate::Replace(items) => {
                self.items.replace(items);
                self.error = None;
            }
            PollUpdate::Nothing => return,
        }
        self.updates += 1;
    }
}

/// Poller lifecycle counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollerStats {
    pub started: u64,
    pub cancelled: u64,
}

impl PollerStats {
    /// Pollers started and not cancelled
    pub fn live(&self) -> u64 {
        self.started - self.cancelled
    }
}

struct Slot<K, T> {
    state: RwLock<ViewState<K, T>>,
    generation: AtomicU64,
    started: AtomicU64,
    cancelled: AtomicU64,
}

impl<K, T> Slot<K, T> {
    /// Apply `f` only if `generation` is still current
    fn write_if_current(&self, generation: u64, f: impl FnOnce(&mut ViewState<K, T>)) -> bool {
        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding result from superseded poller");
            return false;
        }
        f(&mut state);
        true
    }
}

/// View slot that keeps at most one poller running
pub struct PollingView<S: PollSource> {
    source: Arc<S>,
    config: PollingConfig,
    slot: Arc<Slot<S::Key, S::Item>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S: PollSource> PollingView<S> {
    pub fn new(source: S, config: PollingConfig) -> Self {
        Self::with_shared_source(Arc::new(source), config)
    }

    pub fn with_shared_source(source: Arc<S>, config: PollingConfig) -> Self {
        Self {
            source,
            config,
            slot: Arc::new(Slot {
                state: RwLock::new(ViewState::new(config.capacity)),
                generation: AtomicU64::new(0),
                started: AtomicU64::new(0),
                cancelled: AtomicU64::new(0),
            }),
            task: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn config(&self) -> PollingConfig {
        self.config
    }

    pub fn state(&self) -> ViewState<S::Key, S::Item> {
        self.slot.state.read().clone()
    }

    pub fn key(&self) -> Option<S::Key> {
        self.slot.state.read().key.clone()
    }

    pub fn stats(&self) -> PollerStats {
        PollerStats {
            started: self.slot.started.load(Ordering::SeqCst),
            cancelled: self.slot.cancelled.load(Ordering::SeqCst),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Mount for `key`: cancel any running poller, reset state and start
    /// a new one
    pub fn mount(&self, key: S::Key) {
        let mut task = self.task.lock();
        self.cancel_locked(&mut task);

        let generation = {
            let mut state = self.slot.state.write();
            let generation = self.slot.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.key = Some(key.clone());
            state.items.clear();
            state.is_loading = true;
            state.error = None;
            state.updates = 0;
            generation
        };

        let handle = tokio::spawn(run_poller(
            self.source.clone(),
            self.slot.clone(),
            key,
            generation,
            self.config,
        ));
        self.slot.started.fetch_add(1, Ordering::SeqCst);
        *task = Some(handle);
        debug!(generation, interval_ms = self.config.interval.as_millis() as u64, "Poller started");
    }

    /// Change the key; a no-op when the key is unchanged and a poller is
    /// running
    pub fn switch_key(&self, key: S::Key) {
        if self.key().as_ref() == Some(&key) && self.is_running() {
            return;
        }
        self.mount(key);
    }

    /// Remount with the current key (retry after a failed load, or manual
    /// refresh)
    pub fn retry(&self) -> bool {
        match self.key() {
            Some(key) => {
                self.mount(key);
                true
            }
            None => false,
        }
    }

    /// Drop the displayed items; polling continues
    pub fn clear(&self) {
        let mut state = self.slot.state.write();
        state.items.clear();
    }

    /// Stop polling; displayed data is kept
    pub fn unmount(&self) {
        let mut task = self.task.lock();
        self.cancel_locked(&mut task);
        let mut state = self.slot.state.write();
        self.slot.generation.fetch_add(1, Ordering::SeqCst);
        state.is_loading = false;
    }

    fn cancel_locked(&self, task: &mut Option<JoinHandle<()>>) {
        if let Some(handle) = task.take() {
            handle.abort();
            self.slot.cancelled.fetch_add(1, Ordering::SeqCst);
            debug!("Poller cancelled");
        }
    }
}

impl<S: PollSource> Drop for PollingView<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().take() {
            handle.abort();
        }
    }
}

async fn run_poller<S: PollSource>(
    source: Arc<S>,
    slot: Arc<Slot<S::Key, S::Item>>,
    key: S::Key,
    generation: u64,
    config: PollingConfig,
) {
    match source.initial(&key).await {
        Ok(items) => {
            slot.write_if_current(generation, |state| {
                state.items.replace(items);
                state.is_loading = false;
                state.error = None;
            });
        }
        Err(e) => {
            warn!(?key, %e, "Initial load failed");
            let auth_expired = e.is_auth_expired();
            slot.write_if_current(generation, |state| {
                state.is_loading = false;
                state.error = Some(e);
            });
            if auth_expired {
                return;
            }
        }
    }

    let interval = config.interval;
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let polled = match tokio::time::timeout(config.poll_timeout, source.poll(&key)).await {
            Ok(polled) => polled,
            Err(_) => {
                debug!(
                    ?key,
                    timeout_ms = config.poll_timeout.as_millis() as u64,
                    "Poll stalled, abandoning it"
                );
                continue;
            }
        };
        match polled {
            Ok(update) => {
                if !slot.write_if_current(generation, |state| state.apply(update)) {
                    return;
                }
            }
            Err(e) if e.is_auth_expired() => {
                warn!(?key, "Session expired while polling, stopping");
                slot.write_if_current(generation, |state| state.error = Some(e));
                return;
            }
            Err(e) => {
                debug!(?key, %e, "Poll failed, keeping displayed data");
            }
        }
    }
}
