//! Post streams from a file to a running AuthGate server.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tabled::Tabled;

use authgate_core::error::{AppError, ErrorKind};
use authgate_core::types::Stream;
use authgate_ingest::{StreamPayload, parse_file};

use crate::output::{self, OutputFormat};

/// Arguments for the send command
#[derive(Debug, Args)]
pub struct SendArgs {
    /// Path to the stream file
    pub file: PathBuf,

    /// Ingestion endpoint
    #[arg(short, long, default_value = "http://localhost:8081/")]
    pub target: String,

    /// Pause between streams, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

/// Per-stream delivery row
#[derive(Debug, Serialize, Tabled)]
pub struct DeliveryRow {
    /// Stream ID
    pub stream_id: String,
    /// HTTP status, or `-` when the request failed
    pub status: String,
    /// Admission count or error message
    pub detail: String,
}

/// Execute the send command
pub async fn execute(args: &SendArgs, format: OutputFormat) -> Result<(), AppError> {
    let parsed = parse_file(&args.file)?;
    if !parsed.dropped.is_empty() {
        tracing::warn!(dropped = parsed.dropped.len(), "Malformed lines were dropped");
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to build HTTP client", e)
        })?;

    let mut rows = Vec::with_capacity(parsed.streams.len());
    let mut delivered = 0usize;

    for (idx, stream) in parsed.streams.iter().enumerate() {
        if idx > 0 && args.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
        }

        let row = send_stream(&client, &args.target, stream).await;
        if row.status == StatusCode::OK.as_str() {
            delivered += 1;
            tracing::info!(stream_id = %stream.id(), "Successfully sent stream");
        } else {
            tracing::warn!(stream_id = %stream.id(), detail = %row.detail, "Failed to send stream");
        }
        rows.push(row);
    }

    output::print_list(&rows, format);
    if format == OutputFormat::Table {
        output::print_success(&format!(
            "{}/{} streams accepted by {}",
            delivered,
            rows.len(),
            args.target
        ));
    }
    Ok(())
}

async fn send_stream(client: &Client, target: &str, stream: &Stream) -> DeliveryRow {
    let stream_id = stream.id().to_string();
    let payload = StreamPayload::from(stream);

    let response = match client.post(target).json(&payload).send().await {
        Ok(response) => response,
        Err(e) => {
            return DeliveryRow {
                stream_id,
                status: "-".to_string(),
                detail: format!("request failed: {}", e),
            };
        }
    };

    let status = response.status();
    let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);

    DeliveryRow {
        stream_id,
        status: status.as_str().to_string(),
        detail: describe_response(status, &body),
    }
}

/// Pull the interesting field out of an acknowledgement or error body.
fn describe_response(status: StatusCode, body: &serde_json::Value) -> String {
    let field = if status.is_success() { "count" } else { "message" };
    body.get(field)
        .or_else(|| body.get("error"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string())
}
