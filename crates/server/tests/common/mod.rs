//! Common test utilities for E2E testing with mocks.
//!
//! Provides a test fixture that builds the full in-process router with a
//! mock pipeline injected, so API behavior can be exercised without
//! tesseract or a model on disk.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use snapsum_core::testing::MockPipeline;
use snapsum_core::{Config, JobManager, Pipeline};
use snapsum_server::api::create_router;
use snapsum_server::state::AppState;

const MULTIPART_BOUNDARY: &str = "snapsum-test-boundary";

/// Test fixture for E2E testing with a mock pipeline.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock pipeline - queue outcomes, gate runs, inspect calls
    pub pipeline: Arc<MockPipeline>,
    /// Directory uploads land in
    pub upload_dir: PathBuf,
    /// Temporary directory backing upload dir and web root
    pub temp_dir: TempDir,
    jobs: Arc<JobManager>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let upload_dir = temp_dir.path().join("uploads");
        let web_root = temp_dir.path().join("web");
        std::fs::create_dir_all(&upload_dir).expect("Failed to create upload dir");
        std::fs::create_dir_all(&web_root).expect("Failed to create web root");
        std::fs::write(web_root.join("index.html"), "<html>snapsum test ui</html>")
            .expect("Failed to write index.html");

        let mut config = Config::default();
        config.server.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.server.port = 0; // Not used for in-process testing
        config.server.web_root = web_root;
        config.upload.dir = upload_dir.clone();

        let pipeline = MockPipeline::new();
        let jobs = Arc::new(JobManager::new(
            Arc::clone(&pipeline) as Arc<dyn Pipeline>
        ));
        let state = Arc::new(AppState::new(config, Arc::clone(&jobs)));

        Self {
            router: create_router(state),
            pipeline,
            upload_dir,
            temp_dir,
            jobs,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a GET request and return the body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a POST with a multipart form carrying `bytes` as the named field.
    pub async fn post_multipart(
        &self,
        path: &str,
        field_name: &str,
        filename: &str,
        bytes: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: image/png\r\n\r\n",
                MULTIPART_BOUNDARY, field_name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Poll the status endpoint until the job reaches a terminal state.
    pub async fn wait_for_terminal(&self, id: &str) -> Value {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let response = self.get(&format!("/api/status?id={}", id)).await;
            assert_eq!(response.status, StatusCode::OK);
            let state = response.body["state"].as_str().unwrap_or_default().to_string();
            if state == "done" || state == "error" {
                return response.body;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "job {} never reached a terminal state",
                id
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Poll the status endpoint until the job reports at least this progress.
    pub async fn wait_for_progress(&self, id: &str, at_least: u64) -> Value {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let response = self.get(&format!("/api/status?id={}", id)).await;
            if response.body["progress"].as_u64().unwrap_or(0) >= at_least {
                return response.body;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "job {} never reached progress {}",
                id,
                at_least
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Stop the job worker, letting any in-flight job finish first.
    pub async fn shutdown(&self) {
        let jobs = Arc::clone(&self.jobs);
        tokio::task::spawn_blocking(move || jobs.shutdown())
            .await
            .unwrap();
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }
}
