//! Admission control and shutdown configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the stream dispatcher and completion coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Total number of streams admitted over the lifetime of the process.
    #[serde(default = "default_max_streams")]
    pub max_streams: usize,
    /// Hard limit on the admission phase, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Delay between the final admission and the capacity signal, in
    /// milliseconds. Gives the last acknowledgement time to reach its caller.
    #[serde(default = "default_capacity_settle")]
    pub capacity_settle_ms: u64,
}

impl DispatchConfig {
    /// Admission phase timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Delay applied before announcing that capacity is exhausted.
    pub fn capacity_settle(&self) -> Duration {
        Duration::from_millis(self.capacity_settle_ms)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_streams: default_max_streams(),
            timeout_seconds: default_timeout(),
            capacity_settle_ms: default_capacity_settle(),
        }
    }
}

fn default_max_streams() -> usize {
    50
}

fn default_timeout() -> u64 {
    30 * 60
}

fn default_capacity_settle() -> u64 {
    100
}
