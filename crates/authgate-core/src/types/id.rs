//! Newtype identifiers for accounts and streams.
//!
//! Using distinct types prevents accidentally passing a stream id where an
//! account name is expected, and gives the log output a single formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of an account in the user directory.
///
/// Ids are assigned in directory order at startup and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub usize);

impl AccountId {
    /// Return the position of the account in the directory.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for AccountId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Caller-supplied identifier of an event stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(String);

impl StreamId {
    /// Create a stream id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty (or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StreamId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StreamId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_id_display() {
        let id = StreamId::new("stream-7");
        assert_eq!(id.to_string(), "stream-7");
        assert_eq!(id.as_str(), "stream-7");
    }

    #[test]
    fn test_stream_id_blank() {
        assert!(StreamId::new("   ").is_blank());
        assert!(!StreamId::new("s1").is_blank());
    }

    #[test]
    fn test_account_id_serializes_as_number() {
        let json = serde_json::to_string(&AccountId(3)).expect("serialize");
        assert_eq!(json, "3");
    }
}
