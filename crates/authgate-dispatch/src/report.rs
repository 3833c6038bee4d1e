//! The report emitted once the engine has drained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coordinator::ShutdownTrigger;
use crate::metrics::{DurationSummary, OutcomeSnapshot};

/// Final numbers for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownReport {
    /// Why admission ended.
    pub trigger: ShutdownTrigger,
    /// Streams admitted.
    pub accepted: usize,
    /// Admission capacity.
    pub capacity: usize,
    /// Streams that finished normally.
    pub completed: u64,
    /// Streams whose task failed.
    pub failed: u64,
    /// Accumulated processing time and average per admitted stream.
    pub durations: DurationSummary,
    /// Outcome counters across every stream.
    pub outcomes: OutcomeSnapshot,
    /// When the engine started.
    pub started_at: DateTime<Utc>,
    /// When draining finished.
    pub finished_at: DateTime<Utc>,
}

impl ShutdownReport {
    /// Wall-clock time between start and drain.
    pub fn wall_time(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
