//! Processing-time and outcome metrics.

pub mod outcomes;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub use outcomes::{OutcomeCounters, OutcomeSnapshot};

/// Running total of per-stream processing time.
///
/// The lock is private to the accumulator and held for one addition.
#[derive(Debug, Default)]
pub struct MetricsAccumulator {
    total: Mutex<Duration>,
}

impl MetricsAccumulator {
    /// Create a zeroed accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one stream's processing time.
    pub async fn record(&self, elapsed: Duration) {
        let mut total = self.total.lock().await;
        *total += elapsed;
    }

    /// Total recorded so far.
    pub async fn total(&self) -> Duration {
        *self.total.lock().await
    }

    /// Total and per-stream average over `accepted` streams.
    pub async fn summary(&self, accepted: usize) -> DurationSummary {
        DurationSummary::new(self.total().await, accepted)
    }
}

/// Total and average processing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSummary {
    /// Sum of every stream's processing time, in microseconds.
    pub total_us: u64,
    /// `total_us / accepted`, zero when nothing was accepted.
    pub average_us: u64,
}

impl DurationSummary {
    /// Compute the summary for `accepted` streams.
    pub fn new(total: Duration, accepted: usize) -> Self {
        let total_us = saturating_micros(total);
        let average_us = match u64::try_from(accepted) {
            Ok(0) | Err(_) => 0,
            Ok(n) => total_us / n,
        };
        Self {
            total_us,
            average_us,
        }
    }

    /// Total as a [`Duration`].
    pub fn total(&self) -> Duration {
        Duration::from_micros(self.total_us)
    }

    /// Average as a [`Duration`].
    pub fn average(&self) -> Duration {
        Duration::from_micros(self.average_us)
    }
}

fn saturating_micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
