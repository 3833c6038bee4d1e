//! # authgate-core
//!
//! Core crate for AuthGate. Contains configuration schemas, typed
//! identifiers, the stream/event model, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AuthGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
