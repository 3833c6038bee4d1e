//! # authgate-api
//!
//! HTTP ingestion layer for AuthGate built on Axum.
//!
//! Accepts JSON streams from collectors, hands them to the dispatcher, and
//! exposes health and status endpoints.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
