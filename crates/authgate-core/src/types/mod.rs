//! Core type definitions used across the AuthGate workspace.

pub mod id;
pub mod stream;

pub use id::{AccountId, StreamId};
pub use stream::{Event, Stream};
