//! Integration tests for the ingestion endpoints.

use http::StatusCode;
use serde_json::json;

use authgate_auth::OutcomeKind;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_post_root_acknowledges_stream() {
    let app = TestApp::new(50);

    let response = app
        .post_json(
            "/",
            helpers::stream_body(
                "stream-1",
                json!([
                    {"type": "ssh", "name": "dev_user", "passwd": "d3v3l0p3r"},
                    {"type": "sudo", "passwd": "d3v3l0p3r"},
                ]),
            ),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "status": "processing_started",
            "stream_id": "stream-1",
            "count": "1/50"
        })
    );
}

#[tokio::test]
async fn test_api_streams_route_accepts_capitalised_fields() {
    let app = TestApp::new(5);

    let response = app
        .post_json(
            "/api/streams",
            json!({
                "StreamId": "stream-7",
                "Events": [{"Type": "ssh", "Name": "guest", "Passwd": "T3mpPass!"}]
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["stream_id"], "stream-7");
}

#[tokio::test]
async fn test_invalid_json_is_rejected_without_admission() {
    let app = TestApp::new(5);

    let response = app
        .request("POST", "/", Some("{\"streamId\": ".to_string()))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(app.engine.status().await.admitted, 0);
}

#[tokio::test]
async fn test_blank_stream_id_is_rejected() {
    let app = TestApp::new(5);

    let response = app
        .post_json("/", helpers::stream_body("", json!([])))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.engine.status().await.admitted, 0);
}

#[tokio::test]
async fn test_get_on_root_is_method_not_allowed() {
    let app = TestApp::new(5);
    let response = app.request("GET", "/", None).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.body["error"], "METHOD_NOT_ALLOWED");
    assert_eq!(response.body["message"], "Method not allowed");
}

#[tokio::test]
async fn test_get_on_streams_route_returns_json_405() {
    let app = TestApp::new(5);
    let response = app.request("GET", "/api/streams", None).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.body["message"], "Method not allowed");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new(5);
    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_status_reports_admissions_and_outcomes() {
    let app = TestApp::new(5);

    app.post_json(
        "/",
        helpers::stream_body(
            "stream-1",
            json!([
                {"type": "ssh", "name": "tester", "passwd": "t3st3r!123"},
                {"type": "dir"},
            ]),
        ),
    )
    .await;
    app.engine.coordinator().drain().await;

    let response = app.request("GET", "/api/status", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["admitted"], 1);
    assert_eq!(data["capacity"], 5);
    assert_eq!(data["completed"], 1);
    assert_eq!(data["accounts"], 10);
    assert_eq!(data["outcomes"][OutcomeKind::Bound.as_str()], 1);
    assert_eq!(data["outcomes"][OutcomeKind::ListingGranted.as_str()], 1);
}
