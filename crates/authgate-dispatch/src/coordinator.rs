//! Completion coordinator: decides when admission ends and drains the rest.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::task::TaskTracker;
use tracing::info;

use authgate_core::config::DispatchConfig;

/// Why the admission phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownTrigger {
    /// Every admission slot was consumed.
    CapacityReached,
    /// The hard timeout elapsed first.
    Timeout,
    /// An operator signal (Ctrl+C, SIGTERM) or caller-supplied future.
    External,
}

impl std::fmt::Display for ShutdownTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityReached => write!(f, "capacity reached"),
            Self::Timeout => write!(f, "timeout elapsed"),
            Self::External => write!(f, "external signal"),
        }
    }
}

/// Tracks admitted tasks and the "all capacity consumed" signal.
#[derive(Debug)]
pub struct CompletionCoordinator {
    tracker: TaskTracker,
    capacity_tx: watch::Sender<bool>,
    completed: AtomicU64,
    failed: AtomicU64,
    timeout: Duration,
    settle: Duration,
}

impl CompletionCoordinator {
    /// Create a coordinator using the dispatch timeout and settle delay.
    pub fn new(config: &DispatchConfig) -> Self {
        Self::with_timing(config.timeout(), config.capacity_settle())
    }

    /// Create a coordinator with explicit timing.
    pub fn with_timing(timeout: Duration, settle: Duration) -> Self {
        let (capacity_tx, _) = watch::channel(false);
        Self {
            tracker: TaskTracker::new(),
            capacity_tx,
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            timeout,
            settle,
        }
    }

    /// Spawn an admitted unit of work on the tracked task set.
    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn(task);
    }

    /// Raise the capacity signal. Later calls are no-ops.
    pub fn signal_capacity_reached(&self) {
        self.capacity_tx.send_if_modified(|reached| {
            let changed = !*reached;
            *reached = true;
            changed
        });
    }

    /// Whether the capacity signal has been raised.
    pub fn is_capacity_reached(&self) -> bool {
        *self.capacity_tx.borrow()
    }

    /// Record the end of one admitted task.
    pub fn record_completion(&self, succeeded: bool) {
        if succeeded {
            self.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Streams that finished normally.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Streams whose task failed internally.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Admitted tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Block until capacity is reached, the timeout elapses, or `external`
    /// resolves, whichever comes first.
    ///
    /// Once the capacity signal fires, the coordinator waits the settle delay
    /// before returning so the final acknowledgement can reach its caller.
    pub async fn wait<F>(&self, external: F) -> ShutdownTrigger
    where
        F: Future<Output = ()>,
    {
        let mut capacity_rx = self.capacity_tx.subscribe();
        let settle = self.settle;

        let trigger = tokio::select! {
            _ = async {
                // The sender lives in `self`, so this cannot fail.
                let _ = capacity_rx.wait_for(|reached| *reached).await;
                tokio::time::sleep(settle).await;
            } => ShutdownTrigger::CapacityReached,
            _ = tokio::time::sleep(self.timeout) => ShutdownTrigger::Timeout,
            _ = external => ShutdownTrigger::External,
        };

        info!(trigger = %trigger, "Admission phase finished");
        trigger
    }

    /// Wait for every admitted task to finish. Nothing is cancelled.
    pub async fn drain(&self) {
        self.tracker.close();
        let in_flight = self.tracker.len();
        if in_flight > 0 {
            info!(in_flight = in_flight, "Waiting for in-flight streams to complete...");
        }
        self.tracker.wait().await;
        info!(
            completed = self.completed(),
            failed = self.failed(),
            "All admitted streams drained"
        );
    }
}
