//! Response DTOs.

use serde::{Deserialize, Serialize};

use authgate_dispatch::{Admission, EngineStatus};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Acknowledgement for an admitted stream.
///
/// Sent unwrapped so existing collectors can read it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamAccepted {
    /// Always `processing_started`.
    pub status: String,
    /// The admitted stream.
    pub stream_id: String,
    /// `"<admitted>/<capacity>"`.
    pub count: String,
}

impl From<&Admission> for StreamAccepted {
    fn from(admission: &Admission) -> Self {
        Self {
            status: "processing_started".to_string(),
            stream_id: admission.stream_id.as_str().to_string(),
            count: admission.count_label(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Engine status response.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Admission and processing counters.
    #[serde(flatten)]
    pub engine: EngineStatus,
    /// Accounts in the directory.
    pub accounts: usize,
}
