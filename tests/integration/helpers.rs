//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use authgate_api::{AppState, build_app};
use authgate_core::config::AppConfig;
use authgate_dispatch::Engine;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The engine behind the router
    pub engine: Engine,
}

impl TestApp {
    /// Create a test application with the given admission capacity
    pub fn new(max_streams: usize) -> Self {
        Self::with_config(test_config(max_streams))
    }

    /// Create a test application from an explicit configuration
    pub fn with_config(config: AppConfig) -> Self {
        let engine = Engine::new(&config);
        let state = AppState::new(Arc::new(config), engine.clone());
        Self {
            router: build_app(state),
            engine,
        }
    }

    /// Post a JSON value
    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        let body = serde_json::to_string(&body).expect("Failed to serialize body");
        self.request("POST", path, Some(body)).await
    }

    /// Send a request with an optional raw body
    pub async fn request(&self, method: &str, path: &str, body: Option<String>) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.unwrap_or_default()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Test response wrapper
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Reference configuration with a custom capacity and no settle delay
pub fn test_config(max_streams: usize) -> AppConfig {
    let mut config = AppConfig::default();
    config.dispatch.max_streams = max_streams;
    config.dispatch.capacity_settle_ms = 0;
    config
}

/// JSON body for a stream
pub fn stream_body(stream_id: &str, events: Value) -> Value {
    serde_json::json!({ "streamId": stream_id, "events": events })
}
