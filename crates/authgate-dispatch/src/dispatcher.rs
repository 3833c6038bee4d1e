//! Admission control.
//!
//! A single gate guards the admitted counter and the shutting-down flag. Every
//! accepted stream increments the counter exactly once; it is never
//! decremented, so capacity is consumed once per run.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use authgate_auth::SessionAuthenticator;
use authgate_core::error::AppError;
use authgate_core::types::{Stream, StreamId};

use crate::coordinator::CompletionCoordinator;
use crate::metrics::{MetricsAccumulator, OutcomeCounters};

/// Successful admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admission {
    /// The admitted stream.
    pub stream_id: StreamId,
    /// Admitted count including this stream.
    pub count: usize,
    /// Configured capacity.
    pub capacity: usize,
}

impl Admission {
    /// `"<count>/<capacity>"`, as sent in acknowledgements.
    pub fn count_label(&self) -> String {
        format!("{}/{}", self.count, self.capacity)
    }
}

/// Why a stream was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionRejection {
    /// Every admission slot has been used.
    #[error("Maximum streams limit reached ({capacity})")]
    CapacityExceeded { capacity: usize },

    /// The admission phase has ended.
    #[error("Service is shutting down")]
    ShuttingDown,
}

impl From<AdmissionRejection> for AppError {
    fn from(rejection: AdmissionRejection) -> Self {
        match rejection {
            AdmissionRejection::CapacityExceeded { .. } => {
                AppError::rate_limit("Maximum streams limit reached")
            }
            AdmissionRejection::ShuttingDown => {
                AppError::service_unavailable("Not accepting new streams")
            }
        }
    }
}

/// Point-in-time view of the admission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchStatus {
    pub admitted: usize,
    pub capacity: usize,
    pub shutting_down: bool,
}

#[derive(Debug, Default)]
struct AdmissionGate {
    admitted: usize,
    shutting_down: bool,
}

/// Admits streams up to a fixed capacity and runs each on its own task.
#[derive(Debug)]
pub struct Dispatcher {
    authenticator: SessionAuthenticator,
    capacity: usize,
    gate: Mutex<AdmissionGate>,
    coordinator: Arc<CompletionCoordinator>,
    metrics: Arc<MetricsAccumulator>,
    outcomes: Arc<OutcomeCounters>,
}

impl Dispatcher {
    /// Create a dispatcher with `capacity` admission slots.
    pub fn new(
        authenticator: SessionAuthenticator,
        capacity: usize,
        coordinator: Arc<CompletionCoordinator>,
        metrics: Arc<MetricsAccumulator>,
        outcomes: Arc<OutcomeCounters>,
    ) -> Self {
        Self {
            authenticator,
            capacity,
            gate: Mutex::new(AdmissionGate::default()),
            coordinator,
            metrics,
            outcomes,
        }
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Admit a stream, or refuse it without starting any work.
    pub async fn admit(&self, stream: Stream) -> Result<Admission, AdmissionRejection> {
        let stream_id = stream.id().clone();

        let count = {
            let mut gate = self.gate.lock().await;
            // A full gate reports capacity even after shutdown has begun.
            if gate.admitted >= self.capacity {
                warn!(
                    stream_id = %stream_id,
                    capacity = self.capacity,
                    "Rejected stream: maximum streams limit reached"
                );
                return Err(AdmissionRejection::CapacityExceeded {
                    capacity: self.capacity,
                });
            }
            if gate.shutting_down {
                warn!(stream_id = %stream_id, "Rejected stream: shutting down");
                return Err(AdmissionRejection::ShuttingDown);
            }
            gate.admitted += 1;

            // Spawned before the gate is released so a drain that follows
            // `stop_admitting` sees every admitted task.
            self.spawn_stream(stream);
            gate.admitted
        };

        info!(
            stream_id = %stream_id,
            count = count,
            capacity = self.capacity,
            "Accepted stream"
        );

        if count == self.capacity {
            self.coordinator.signal_capacity_reached();
        }

        Ok(Admission {
            stream_id,
            count,
            capacity: self.capacity,
        })
    }

    /// Refuse every later admission. Returns the admitted count.
    pub async fn stop_admitting(&self) -> usize {
        let mut gate = self.gate.lock().await;
        if !gate.shutting_down {
            gate.shutting_down = true;
            info!(admitted = gate.admitted, "Stopped accepting new streams");
        }
        gate.admitted
    }

    /// Current gate state.
    pub async fn status(&self) -> DispatchStatus {
        let gate = self.gate.lock().await;
        DispatchStatus {
            admitted: gate.admitted,
            capacity: self.capacity,
            shutting_down: gate.shutting_down,
        }
    }

    fn spawn_stream(&self, stream: Stream) {
        let authenticator = self.authenticator.clone();
        let coordinator = Arc::clone(&self.coordinator);
        let metrics = Arc::clone(&self.metrics);
        let outcomes = Arc::clone(&self.outcomes);

        self.coordinator.spawn(async move {
            let started = Instant::now();
            let result = AssertUnwindSafe(authenticator.run(&stream))
                .catch_unwind()
                .await;
            let elapsed = started.elapsed();
            metrics.record(elapsed).await;

            match result {
                Ok(report) => {
                    outcomes.record_report(&report);
                    coordinator.record_completion(true);
                    info!(
                        stream_id = %report.stream_id,
                        events = report.outcomes.len(),
                        duration_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                        "Stream processed"
                    );
                }
                Err(_) => {
                    coordinator.record_completion(false);
                    error!(stream_id = %stream.id(), "Stream processing task panicked");
                }
            }
        });
    }
}
