//! Integration tests for admission control over HTTP.

use http::StatusCode;
use serde_json::json;

use authgate_dispatch::ShutdownTrigger;

use crate::helpers::{self, TestApp};

fn listing_stream(id: &str) -> serde_json::Value {
    helpers::stream_body(id, json!([{"type": "dir"}]))
}

#[tokio::test]
async fn test_third_stream_over_capacity_gets_429() {
    let app = TestApp::new(2);

    let first = app.post_json("/", listing_stream("s1")).await;
    let second = app.post_json("/", listing_stream("s2")).await;
    let third = app.post_json("/", listing_stream("s3")).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["count"], "1/2");
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["count"], "2/2");
    assert_eq!(third.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(third.body["message"], "Maximum streams limit reached");

    let report = app
        .engine
        .run_until_complete(std::future::pending())
        .await;
    assert_eq!(report.trigger, ShutdownTrigger::CapacityReached);
    assert_eq!(report.accepted, 2);
    assert_eq!(report.completed, 2);
}

#[tokio::test]
async fn test_streams_after_shutdown_get_503() {
    let app = TestApp::new(10);
    app.post_json("/", listing_stream("s1")).await;

    app.engine.shutdown(ShutdownTrigger::External).await;

    let late = app.post_json("/", listing_stream("s2")).await;
    assert_eq!(late.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(late.body["error"], "SERVICE_UNAVAILABLE");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_posts_respect_capacity() {
    let app = std::sync::Arc::new(TestApp::new(8));

    let mut handles = Vec::new();
    for n in 0..40 {
        let app = std::sync::Arc::clone(&app);
        handles.push(tokio::spawn(async move {
            app.post_json("/", listing_stream(&format!("s{n}")))
                .await
                .status
        }));
    }

    let mut ok = 0;
    let mut limited = 0;
    for handle in futures::future::join_all(handles).await {
        match handle.expect("task") {
            StatusCode::OK => ok += 1,
            StatusCode::TOO_MANY_REQUESTS => limited += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(ok, 8);
    assert_eq!(limited, 32);
}
