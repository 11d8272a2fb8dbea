//! E2E tests for health, config, metrics, and static file serving.

mod common;

use axum::http::StatusCode;
use common::TestFixture;
use serde_json::json;

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], json!("ok"));
}

#[tokio::test]
async fn test_config_endpoint_redacts_model_path() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/config").await;

    assert_eq!(response.status, StatusCode::OK);
    // Only the model's file name is exposed, never the full path.
    let model = response.body["model"].as_str().unwrap();
    assert!(!model.contains('/'));
    assert!(response.body["params"]["max_new_tokens"].is_number());
    assert!(response.body["server"]["port"].is_number());
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_job_counters() {
    let fixture = TestFixture::new();
    // Generate at least one request so the HTTP counters exist.
    fixture.get("/api/health").await;

    let (status, body) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("snapsum_http_requests_total"));
    assert!(body.contains("snapsum_jobs_submitted_total"));
}

#[tokio::test]
async fn test_root_serves_web_ui() {
    let fixture = TestFixture::new();
    let (status, body) = fixture.get_text("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("snapsum test ui"));
}

#[tokio::test]
async fn test_unknown_path_falls_back_to_index() {
    let fixture = TestFixture::new();
    let (status, body) = fixture.get_text("/some/spa/route").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("snapsum test ui"));
}
