//! # authgate-ingest
//!
//! Turns external input into [`Stream`](authgate_core::types::Stream) values.
//!
//! - [`json`]: the network form posted by a collector.
//! - [`text`]: the offline `#<stream-id>` / `ssh,<name>,<pw>` file format.

pub mod json;
pub mod text;

pub use json::{EventRecord, StreamPayload};
pub use text::{MalformedLine, MalformedReason, ParsedStreams, parse_file, parse_streams};
