//! AuthGate Server: concurrent session-authentication engine.
//!
//! Accepts event streams over HTTP until capacity is consumed, the timeout
//! elapses or the process is signalled, then drains every admitted stream and
//! reports processing time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use authgate_api::AppState;
use authgate_core::config::AppConfig;
use authgate_core::error::AppError;
use authgate_dispatch::{Engine, ShutdownReport};

/// Grace period for open HTTP connections once admission has ended.
const HTTP_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `AUTHGATE_CONFIG` or the layered `config/` files
fn load_configuration() -> Result<AppConfig, AppError> {
    if let Ok(path) = std::env::var("AUTHGATE_CONFIG") {
        return AppConfig::from_file(&path);
    }

    let env = std::env::var("AUTHGATE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AuthGate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Directory, dispatcher and coordinator ────────────
    let engine = Engine::new(&config);
    let config = Arc::new(config);

    // ── Step 2: Bind HTTP listener ───────────────────────────────
    let state = AppState::new(Arc::clone(&config), engine.clone());
    let listener = authgate_api::app::bind(&state).await?;

    // ── Step 3: Serve until admission ends ───────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = tokio::spawn(authgate_api::app::serve(listener, state, async move {
        let _ = shutdown_rx.wait_for(|stop| *stop).await;
    }));

    let trigger = engine.wait(shutdown_signal()).await;
    tracing::info!("Admission finished ({}), shutting down...", trigger);

    // ── Step 4: Stop accepting, close the HTTP server ────────────
    engine.dispatcher().stop_admitting().await;
    let _ = shutdown_tx.send(true);
    match tokio::time::timeout(HTTP_SHUTDOWN_GRACE, server).await {
        Ok(Ok(Ok(()))) => tracing::info!("HTTP server stopped"),
        Ok(Ok(Err(e))) => tracing::error!("HTTP server error: {}", e),
        Ok(Err(e)) => tracing::error!("HTTP server task failed: {}", e),
        Err(_) => tracing::warn!("HTTP server did not stop within {:?}", HTTP_SHUTDOWN_GRACE),
    }

    // ── Step 5: Drain admitted streams and report ────────────────
    let report = engine.shutdown(trigger).await;
    log_report(&report);

    tracing::info!("AuthGate shut down gracefully");
    Ok(())
}

/// Emit the final processing-time report
fn log_report(report: &ShutdownReport) {
    tracing::info!(
        "Processed {}/{} streams ({} failed) in {:?} total, {:?} average per stream",
        report.completed,
        report.accepted,
        report.failed,
        report.durations.total(),
        report.durations.average(),
    );
    for (outcome, count) in report.outcomes.counts.iter().filter(|(_, c)| **c > 0) {
        tracing::info!("  {:<18} {}", outcome, count);
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
