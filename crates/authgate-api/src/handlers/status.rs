//! Engine status handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, StatusResponse};
use crate::state::AppState;

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Json<ApiResponse<StatusResponse>> {
    let engine = state.engine.status().await;
    Json(ApiResponse::ok(StatusResponse {
        engine,
        accounts: state.engine.directory().len(),
    }))
}
