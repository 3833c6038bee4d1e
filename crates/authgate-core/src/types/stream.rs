//! The stream/event model consumed by the authentication engine.

use serde::{Deserialize, Serialize};

use super::id::StreamId;

/// A single security-relevant event inside a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Attempt to bind the stream to a named account (`ssh` on the wire).
    Login {
        /// Account name to log into.
        actor_name: String,
        /// Shared secret presented for the account.
        credential: String,
    },
    /// Privilege elevation on the bound account (`sudo` on the wire).
    Elevate {
        /// Secret presented for elevation.
        credential: String,
    },
    /// Directory listing on the bound account (`dir` on the wire).
    ListDirectory,
    /// An event kind this build does not know. Ignored by the engine.
    Unrecognized {
        /// The wire kind as received.
        kind: String,
    },
}

impl Event {
    /// Build a login event.
    pub fn login(actor_name: impl Into<String>, credential: impl Into<String>) -> Self {
        Self::Login {
            actor_name: actor_name.into(),
            credential: credential.into(),
        }
    }

    /// Build an elevation event.
    pub fn elevate(credential: impl Into<String>) -> Self {
        Self::Elevate {
            credential: credential.into(),
        }
    }

    /// Short wire name of the event kind.
    pub fn wire_kind(&self) -> &str {
        match self {
            Self::Login { .. } => "ssh",
            Self::Elevate { .. } => "sudo",
            Self::ListDirectory => "dir",
            Self::Unrecognized { kind } => kind,
        }
    }
}

/// An ordered, immutable sequence of events attributed to one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    id: StreamId,
    events: Vec<Event>,
}

impl Stream {
    /// Create a stream from its id and events.
    pub fn new(id: impl Into<StreamId>, events: Vec<Event>) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }

    /// The stream id.
    pub fn id(&self) -> &StreamId {
        &self.id
    }

    /// The events in arrival order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events in the stream.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the stream carries no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_kinds() {
        assert_eq!(Event::login("guest", "x").wire_kind(), "ssh");
        assert_eq!(Event::elevate("x").wire_kind(), "sudo");
        assert_eq!(Event::ListDirectory.wire_kind(), "dir");
        assert_eq!(
            Event::Unrecognized {
                kind: "scp".to_string()
            }
            .wire_kind(),
            "scp"
        );
    }

    #[test]
    fn test_unrecognized_event_serde_keeps_wire_kind() {
        let event = Event::Unrecognized {
            kind: "scp".to_string(),
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"event": "unrecognized", "kind": "scp"})
        );

        let back: Event = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn test_stream_serde_round_trip() {
        let stream = Stream::new(
            "s1",
            vec![Event::login("guest", "T3mpPass!"), Event::ListDirectory],
        );
        let json = serde_json::to_string(&stream).expect("serialize");
        let back: Stream = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, stream);
    }

    #[test]
    fn test_stream_accessors() {
        let stream = Stream::new("s1", vec![Event::ListDirectory]);
        assert_eq!(stream.id().as_str(), "s1");
        assert_eq!(stream.len(), 1);
        assert!(!stream.is_empty());
    }
}
