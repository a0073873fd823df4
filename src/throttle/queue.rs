//! Dual-window admission-control queue
//!
//! Tasks wait in a FIFO list and are released in batches. Each drain
//! releases at most `min(remaining_quota, max_per_interval)` tasks and then
//! re-arms itself one interval later. A second, slower timer refills the
//! quota once per window while there is work outstanding.
//!
//! Timers are Tokio tasks holding a weak reference to the queue, so dropping
//! the last queue handle stops them and drops whatever is still queued.
//! Waiters whose caller went away are discarded without spending budget.
//! All methods that may drain must be called from within a Tokio runtime.

use super::types::{ThrottleConfig, MIN_RECOMMENDED_INTERVAL};
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

enum Task {
    Callback(Box<dyn FnOnce() + Send + 'static>),
    Waiter(oneshot::Sender<()>),
}

impl Task {
    /// A waiter nobody is listening to any more
    fn is_abandoned(&self) -> bool {
        matches!(self, Task::Waiter(tx) if tx.is_closed())
    }

    fn run(self) {
        match self {
            Task::Callback(f) => f(),
            // The waiter may have given up since the last prune.
            Task::Waiter(tx) => {
                let _ = tx.send(());
            }
        }
    }
}

/// Mutable queue state, guarded by a single mutex
struct QueueState {
    tasks: VecDeque<Task>,
    last_dequeue: Option<Instant>,
    remaining_quota: u32,
    drain_timer: Option<JoinHandle<()>>,
    drain_generation: u64,
    refill_timer: Option<JoinHandle<()>>,
    disposed: bool,
}

impl QueueState {
    /// Drop waiters whose caller went away. They never count against a budget.
    fn prune_abandoned(&mut self) {
        let queued = self.tasks.len();
        self.tasks.retain(|task| !task.is_abandoned());
        let dropped = queued - self.tasks.len();
        if dropped > 0 {
            debug!(dropped, pending = self.tasks.len(), "Dropped abandoned waiters");
        }
    }
}

struct Shared {
    config: ThrottleConfig,
    interval: Duration,
    max_per_interval: u32,
    state: Mutex<QueueState>,
}

/// FIFO queue enforcing a burst budget and a rolling quota.
///
/// Cloning yields another handle to the same queue; every clone draws from
/// the same budgets.
#[derive(Clone)]
pub struct ThrottledQueue {
    shared: Arc<Shared>,
}

impl ThrottledQueue {
    /// Create a new queue with the given config.
    ///
    /// Fails when the config would let the queue stall or spin.
    pub fn new(config: &ThrottleConfig) -> Result<Self> {
        config.validate()?;
        let (interval, max_per_interval) = config.effective_burst();
        if interval < MIN_RECOMMENDED_INTERVAL {
            warn!(
                "Throttle interval of {:?} is below {:?}; timer imprecision may dominate",
                interval, MIN_RECOMMENDED_INTERVAL
            );
        }

        Ok(Self {
            shared: Arc::new(Shared {
                config: config.clone(),
                interval,
                max_per_interval,
                state: Mutex::new(QueueState {
                    tasks: VecDeque::new(),
                    last_dequeue: None,
                    remaining_quota: config.quota_per_window,
                    drain_timer: None,
                    drain_generation: 0,
                    refill_timer: None,
                    disposed: false,
                }),
            }),
        })
    }

    /// Configuration this queue was built from
    pub fn config(&self) -> &ThrottleConfig {
        &self.shared.config
    }

    /// Queue a task. It runs once both budgets allow it.
    ///
    /// When no drain is scheduled the queue drains immediately, so the task
    /// may run before this method returns.
    pub fn enqueue<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.push(Task::Callback(Box::new(task)));
    }

    /// Wait until the caller is admitted.
    ///
    /// The slot is queued when this is called, not when the future is first
    /// polled. Dropping the future gives the slot up. The future resolves to
    /// [`Error::QueueClosed`] if every queue handle is dropped first.
    pub fn admit(&self) -> impl Future<Output = Result<()>> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.push(Task::Waiter(tx));
        async move { rx.await.map_err(|_| Error::QueueClosed) }
    }

    /// Wait for admission, then run the future produced by `f`
    pub async fn run<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.admit().await?;
        f().await
    }

    fn push(&self, task: Task) {
        let batch = {
            let mut state = self.shared.lock();
            state.tasks.push_back(task);
            if state.drain_timer.is_some() || state.disposed {
                return;
            }
            self.shared.take_batch(&mut state)
        };
        run_batch(batch);
    }

    /// Number of tasks waiting for admission
    pub fn pending(&self) -> usize {
        self.shared.lock().tasks.len()
    }

    /// Tasks still allowed in the current quota window
    pub fn remaining_quota(&self) -> u32 {
        self.shared.lock().remaining_quota
    }

    /// True when no drain is scheduled
    pub fn is_idle(&self) -> bool {
        self.shared.lock().drain_timer.is_none()
    }

    /// Stop all timers. Queued tasks stay queued and are never drained.
    pub fn dispose(&self) {
        let mut state = self.shared.lock();
        state.disposed = true;
        if let Some(handle) = state.drain_timer.take() {
            handle.abort();
        }
        if let Some(handle) = state.refill_timer.take() {
            handle.abort();
        }
        debug!(pending = state.tasks.len(), "Throttled queue disposed");
    }

    /// Whether [`dispose`](Self::dispose) has been called
    pub fn is_disposed(&self) -> bool {
        self.shared.lock().disposed
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Release the next batch, or reschedule if called too early.
    fn take_batch(self: &Arc<Self>, state: &mut QueueState) -> Vec<Task> {
        if state.disposed {
            return Vec::new();
        }

        state.prune_abandoned();
        if state.tasks.is_empty() {
            return Vec::new();
        }

        let now = Instant::now();
        if let Some(last) = state.last_dequeue {
            let elapsed = now.duration_since(last);
            if elapsed < self.interval {
                // Timers can fire early; wait out the remainder.
                self.schedule_drain(state, self.interval - elapsed);
                return Vec::new();
            }
        }

        let budget = state.remaining_quota.min(self.max_per_interval) as usize;
        let take = budget.min(state.tasks.len());
        state.remaining_quota -= take as u32;
        state.last_dequeue = Some(now);
        let batch: Vec<Task> = state.tasks.drain(..take).collect();

        debug!(
            admitted = batch.len(),
            pending = state.tasks.len(),
            remaining_quota = state.remaining_quota,
            "Drained throttled queue"
        );

        self.schedule_drain(state, self.interval);
        self.ensure_refill(state);
        batch
    }

    fn schedule_drain(self: &Arc<Self>, state: &mut QueueState, delay: Duration) {
        if let Some(handle) = state.drain_timer.take() {
            handle.abort();
        }
        state.drain_generation += 1;
        let generation = state.drain_generation;
        let deadline = Instant::now() + delay;
        let weak = Arc::downgrade(self);
        state.drain_timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(shared) = weak.upgrade() {
                shared.on_drain_timer(generation);
            }
        }));
    }

    fn on_drain_timer(self: &Arc<Self>, generation: u64) {
        let batch = {
            let mut state = self.lock();
            // A newer timer replaced this one while it was waking up.
            if state.drain_generation != generation {
                return;
            }
            state.drain_timer = None;
            self.take_batch(&mut state)
        };
        run_batch(batch);
    }

    fn ensure_refill(self: &Arc<Self>, state: &mut QueueState) {
        if state.refill_timer.is_some() {
            return;
        }
        let window = self.config.window();
        let mut deadline = Instant::now() + window;
        let weak = Arc::downgrade(self);
        state.refill_timer = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep_until(deadline).await;
                deadline += window;
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                if !shared.refill() {
                    return;
                }
            }
        }));
    }

    /// Refill the quota. Returns false once the refill timer should stop.
    fn refill(&self) -> bool {
        let mut state = self.lock();
        state.remaining_quota = self.config.quota_per_window;
        state.prune_abandoned();
        debug!(
            quota = state.remaining_quota,
            pending = state.tasks.len(),
            "Refilled throttle quota"
        );
        if state.tasks.is_empty() || state.disposed {
            state.refill_timer = None;
            return false;
        }
        true
    }
}

fn run_batch(batch: Vec<Task>) {
    for task in batch {
        task.run();
    }
}

impl std::fmt::Debug for ThrottledQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("ThrottledQueue")
            .field("config", &self.shared.config)
            .field("pending", &state.tasks.len())
            .field("remaining_quota", &state.remaining_quota)
            .field("disposed", &state.disposed)
            .finish_non_exhaustive()
    }
}
