//! Wires the directory, dispatcher, coordinator and metrics together.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use authgate_auth::{LoginPolicy, SessionAuthenticator, UserDirectory};
use authgate_core::config::AppConfig;

use crate::coordinator::{CompletionCoordinator, ShutdownTrigger};
use crate::dispatcher::Dispatcher;
use crate::metrics::{MetricsAccumulator, OutcomeCounters, OutcomeSnapshot};
use crate::report::ShutdownReport;

/// Live engine state, as served by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub admitted: usize,
    pub capacity: usize,
    pub completed: u64,
    pub failed: u64,
    pub in_flight: usize,
    pub shutting_down: bool,
    pub outcomes: OutcomeSnapshot,
}

/// One run of the authentication engine.
///
/// Shutdown order: stop accepting, drain in-flight streams, report.
#[derive(Debug, Clone)]
pub struct Engine {
    directory: Arc<UserDirectory>,
    dispatcher: Arc<Dispatcher>,
    coordinator: Arc<CompletionCoordinator>,
    metrics: Arc<MetricsAccumulator>,
    outcomes: Arc<OutcomeCounters>,
    started_at: DateTime<Utc>,
}

impl Engine {
    /// Build an engine from the application configuration.
    pub fn new(config: &AppConfig) -> Self {
        let directory = Arc::new(UserDirectory::from_config(&config.directory));
        let coordinator = Arc::new(CompletionCoordinator::new(&config.dispatch));
        Self::with_parts(
            directory,
            LoginPolicy::from(&config.auth),
            config.dispatch.max_streams,
            coordinator,
        )
    }

    /// Build an engine around an existing directory and coordinator.
    pub fn with_parts(
        directory: Arc<UserDirectory>,
        policy: LoginPolicy,
        capacity: usize,
        coordinator: Arc<CompletionCoordinator>,
    ) -> Self {
        let metrics = Arc::new(MetricsAccumulator::new());
        let outcomes = Arc::new(OutcomeCounters::new());
        let authenticator = SessionAuthenticator::new(Arc::clone(&directory), policy);
        let dispatcher = Arc::new(Dispatcher::new(
            authenticator,
            capacity,
            Arc::clone(&coordinator),
            Arc::clone(&metrics),
            Arc::clone(&outcomes),
        ));

        info!(
            accounts = directory.len(),
            capacity = capacity,
            lockout_threshold = policy.lockout_threshold,
            rebind_failure = %policy.rebind_failure,
            "Authentication engine initialized"
        );

        Self {
            directory,
            dispatcher,
            coordinator,
            metrics,
            outcomes,
            started_at: Utc::now(),
        }
    }

    /// The shared account directory.
    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }

    /// The admission front door.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// The completion coordinator.
    pub fn coordinator(&self) -> &Arc<CompletionCoordinator> {
        &self.coordinator
    }

    /// Block until capacity, timeout, or `external`.
    pub async fn wait<F>(&self, external: F) -> ShutdownTrigger
    where
        F: Future<Output = ()>,
    {
        self.coordinator.wait(external).await
    }

    /// Stop admitting, drain every admitted stream and build the report.
    pub async fn shutdown(&self, trigger: ShutdownTrigger) -> ShutdownReport {
        let accepted = self.dispatcher.stop_admitting().await;
        self.coordinator.drain().await;

        let report = ShutdownReport {
            trigger,
            accepted,
            capacity: self.dispatcher.capacity(),
            completed: self.coordinator.completed(),
            failed: self.coordinator.failed(),
            durations: self.metrics.summary(accepted).await,
            outcomes: self.outcomes.snapshot(),
            started_at: self.started_at,
            finished_at: Utc::now(),
        };

        info!(
            trigger = %report.trigger,
            accepted = report.accepted,
            completed = report.completed,
            failed = report.failed,
            total_us = report.durations.total_us,
            average_us = report.durations.average_us,
            "Engine shut down"
        );
        report
    }

    /// [`Engine::wait`] followed by [`Engine::shutdown`].
    pub async fn run_until_complete<F>(&self, external: F) -> ShutdownReport
    where
        F: Future<Output = ()>,
    {
        let trigger = self.wait(external).await;
        self.shutdown(trigger).await
    }

    /// Current engine status.
    pub async fn status(&self) -> EngineStatus {
        let gate = self.dispatcher.status().await;
        EngineStatus {
            admitted: gate.admitted,
            capacity: gate.capacity,
            completed: self.coordinator.completed(),
            failed: self.coordinator.failed(),
            in_flight: self.coordinator.in_flight(),
            shutting_down: gate.shutting_down,
            outcomes: self.outcomes.snapshot(),
        }
    }
}
