//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! backed by a temporary SQLite file and a mock metadata service, so the
//! whole request path runs without external infrastructure.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use songbook_core::testing::MockMetadataSource;
use songbook_core::{
    create_enrichment_system, load_config_from_str, MetadataSource, SongService, SongStore,
    SqliteSongStore,
};
use songbook_server::state::AppState;

/// Re-export fixtures for test convenience
pub use songbook_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_song_creation() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/songs", json!({
///         "group": "Rammstein",
///         "song": "Weit Weg"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock metadata service - configure lookup responses
    pub metadata: Arc<MockMetadataSource>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = load_config_from_str(&format!(
            r#"
[server]
host = "127.0.0.1"

[database]
path = {:?}

[metadata]
url = "http://metadata.test:9000"

[pagination]
max_limit = {}
default_songs_limit = {}
default_verse_limit = {}
"#,
            db_path,
            test_config.max_limit,
            test_config.default_songs_limit,
            test_config.default_verse_limit,
        ))
        .expect("Failed to build test config");

        let metadata = Arc::new(MockMetadataSource::new());
        let store: Arc<dyn SongStore> =
            Arc::new(SqliteSongStore::new(&db_path).expect("Failed to create song store"));

        // Create and spawn the enrichment worker
        let (handle, worker) = create_enrichment_system(
            Arc::clone(&store),
            Arc::clone(&metadata) as Arc<dyn MetadataSource>,
            16,
            2,
        );
        tokio::spawn(worker.run());

        let songs = SongService::new(store, handle);
        let state = Arc::new(AppState::new(config, songs));
        let router = songbook_server::api::create_router(state);

        Self {
            router,
            metadata,
            temp_dir,
        }
    }

    /// Create a song and return its id.
    pub async fn create_song(&self, group: &str, song: &str) -> i64 {
        let response = self
            .post(
                "/api/v1/songs",
                serde_json::json!({ "group": group, "song": song }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().expect("id in response")
    }

    /// Poll a song until `field` is present or the timeout runs out.
    pub async fn wait_for_field(&self, id: i64, field: &str) -> Option<Value> {
        let path = format!("/api/v1/songs/{}", id);
        for _ in 0..100 {
            let response = self.get(&path).await;
            if let Some(value) = response.body.get(field) {
                return Some(value.clone());
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request_raw("POST", path, body).await
    }

    /// Send a PUT request with raw string body.
    pub async fn put_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request_raw("PUT", path, body).await
    }

    /// Get the raw text body of a response (for non-JSON endpoints).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn request_raw(&self, method: &str, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub max_limit: u32,
    pub default_songs_limit: u32,
    pub default_verse_limit: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            max_limit: 100,
            default_songs_limit: 10,
            default_verse_limit: 2,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
