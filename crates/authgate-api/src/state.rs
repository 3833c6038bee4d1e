//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use authgate_core::config::AppConfig;
use authgate_dispatch::Engine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// The authentication engine
    pub engine: Engine,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Build state around an existing engine.
    pub fn new(config: Arc<AppConfig>, engine: Engine) -> Self {
        Self {
            config,
            engine,
            started_at: Instant::now(),
        }
    }
}
