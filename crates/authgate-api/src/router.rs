//! Route definitions for the AuthGate HTTP API.
//!
//! Collectors post streams to `/`; the same handler is mounted under `/api`
//! next to the health and status routes.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::error::method_not_allowed;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(stream_routes())
        .merge(health_routes());

    Router::new()
        .route(
            "/",
            post(handlers::stream::submit_stream).fallback(method_not_allowed),
        )
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Stream ingestion
fn stream_routes() -> Router<AppState> {
    Router::new().route(
        "/streams",
        post(handlers::stream::submit_stream).fallback(method_not_allowed),
    )
}

/// Health and engine status
fn health_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/health",
            get(handlers::health::health).fallback(method_not_allowed),
        )
        .route(
            "/status",
            get(handlers::status::status).fallback(method_not_allowed),
        )
}
