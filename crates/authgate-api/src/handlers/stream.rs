//! Stream ingestion handler.

use axum::Json;
use axum::extract::State;

use authgate_ingest::StreamPayload;

use crate::dto::response::StreamAccepted;
use crate::error::ApiError;
use crate::state::AppState;

/// POST / and POST /api/streams
///
/// The body is read as text and decoded here so collectors that omit the
/// `Content-Type` header are still accepted.
pub async fn submit_stream(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<StreamAccepted>, ApiError> {
    let stream = StreamPayload::from_json(&body)?.into_stream()?;
    let admission = state.engine.dispatcher().admit(stream).await?;
    Ok(Json(StreamAccepted::from(&admission)))
}
