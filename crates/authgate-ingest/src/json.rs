//! JSON wire format for streams.
//!
//! ```json
//! {"streamId": "stream-1", "events": [{"type": "ssh", "name": "guest", "passwd": "T3mpPass!"}]}
//! ```
//!
//! Capitalised field names (`StreamId`, `Events`, `Type`, `Name`, `Passwd`)
//! are accepted as well, matching older collectors.

use serde::{Deserialize, Serialize};
use validator::Validate;

use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::types::{Event, Stream};

/// One event as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// `ssh`, `sudo` or `dir`. Anything else is carried through and ignored.
    #[serde(rename = "type", alias = "Type")]
    pub kind: String,
    /// Account name (`ssh` only).
    #[serde(default, alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Secret (`ssh` and `sudo`).
    #[serde(default, alias = "Passwd", skip_serializing_if = "Option::is_none")]
    pub passwd: Option<String>,
}

impl EventRecord {
    /// Convert to the engine's event model.
    ///
    /// Missing fields become empty strings: an `ssh` without a name is an
    /// unknown-user login, a `sudo` without a secret never matches.
    pub fn to_event(&self) -> Event {
        match self.kind.as_str() {
            "ssh" => Event::login(
                self.name.clone().unwrap_or_default(),
                self.passwd.clone().unwrap_or_default(),
            ),
            "sudo" => Event::elevate(self.passwd.clone().unwrap_or_default()),
            "dir" => Event::ListDirectory,
            other => Event::Unrecognized {
                kind: other.to_string(),
            },
        }
    }
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::Login {
                actor_name,
                credential,
            } => Self {
                kind: "ssh".to_string(),
                name: Some(actor_name.clone()),
                passwd: Some(credential.clone()),
            },
            Event::Elevate { credential } => Self {
                kind: "sudo".to_string(),
                name: None,
                passwd: Some(credential.clone()),
            },
            other => Self {
                kind: other.wire_kind().to_string(),
                name: None,
                passwd: None,
            },
        }
    }
}

/// A stream as posted to the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StreamPayload {
    /// Stream identifier.
    #[serde(rename = "streamId", alias = "StreamId", alias = "stream_id")]
    #[validate(length(min = 1, message = "streamId is required"))]
    pub stream_id: String,
    /// Events in arrival order.
    #[serde(default, alias = "Events")]
    pub events: Vec<EventRecord>,
}

impl StreamPayload {
    /// Validate the payload and convert it into a [`Stream`].
    pub fn into_stream(self) -> AppResult<Stream> {
        self.validate()
            .map_err(|e| AppError::validation(format!("Invalid stream payload: {e}")))?;
        if self.stream_id.trim().is_empty() {
            return Err(AppError::validation("streamId must not be blank"));
        }

        let events = self.events.iter().map(EventRecord::to_event).collect();
        Ok(Stream::new(self.stream_id, events))
    }

    /// Parse a JSON body.
    pub fn from_json(body: &str) -> AppResult<Self> {
        serde_json::from_str(body)
            .map_err(|e| AppError::validation(format!("Invalid JSON stream payload: {e}")))
    }
}

impl From<&Stream> for StreamPayload {
    fn from(stream: &Stream) -> Self {
        Self {
            stream_id: stream.id().as_str().to_string(),
            events: stream.events().iter().map(EventRecord::from).collect(),
        }
    }
}
