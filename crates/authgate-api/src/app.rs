//! Application builder and HTTP server loop.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use authgate_core::error::{AppError, ErrorKind};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state).layer(TraceLayer::new_for_http())
}

/// Bind the configured address.
pub async fn bind(state: &AppState) -> Result<TcpListener, AppError> {
    let addr = state.config.server.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Io, format!("Failed to bind to {addr}"), e)
    })?;
    tracing::info!("AuthGate listening on http://{}", addr);
    Ok(listener)
}

/// Serve the application until `shutdown` resolves.
///
/// In-flight requests are allowed to finish; requests arriving after the
/// signal are refused at the socket.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Io, "Server error", e))
}
