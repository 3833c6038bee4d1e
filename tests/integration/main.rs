//! Workspace integration tests.

mod admission_test;
mod engine_test;
mod helpers;
mod stream_test;
