//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock search providers injected, enabling E2E testing of the API
//! without real indexers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use mediasearch_core::{
    testing::MockProvider, Config, MdbListClient, MdbListConfig, SearchAggregator,
    SearchProvider,
};

/// Re-export fixtures for test convenience
pub use mediasearch_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Two providers are registered, in this order:
/// - `external` (MockProvider)
/// - `jackett` (MockProvider)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_movie_search() {
///     let fixture = TestFixture::new().await;
///     fixture.jackett.set_results(vec![fixtures::record("A", "abc")]).await;
///
///     let response = fixture.get("/api/v1/search/movie?imdb_id=tt1").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock generic-search provider
    pub external: MockProvider,
    /// Mock Torznab provider
    pub jackett: MockProvider,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks and no list provider key.
    pub async fn new() -> Self {
        Self::with_providers(
            MockProvider::new("external_search"),
            MockProvider::new("jackett"),
            MdbListConfig::default(),
        )
    }

    /// Create a fixture whose list provider points at `base_url`.
    pub async fn with_mdblist(base_url: &str, api_key: &str) -> Self {
        Self::with_providers(
            MockProvider::new("external_search"),
            MockProvider::new("jackett"),
            MdbListConfig {
                api_key: api_key.to_string(),
                base_url: base_url.to_string(),
                timeout_secs: 5,
            },
        )
    }

    /// Create a fixture from explicit providers.
    pub fn with_providers(
        external: MockProvider,
        jackett: MockProvider,
        mdblist: MdbListConfig,
    ) -> Self {
        let providers: Vec<Arc<dyn SearchProvider>> =
            vec![Arc::new(external.clone()), Arc::new(jackett.clone())];

        let config = Config {
            mdblist: mdblist.clone(),
            ..Default::default()
        };

        let mdblist = Arc::new(MdbListClient::new(mdblist).expect("Failed to create MDBList client"));

        let state = Arc::new(mediasearch_server::state::AppState::new(
            config,
            SearchAggregator::new(providers),
            mdblist,
        ));

        // Create router
        let router = mediasearch_server::api::create_router(state);

        Self {
            router,
            external,
            jackett,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
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
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// Spawn an upstream on `127.0.0.1` answering every GET with `body`.
///
/// Returns the base URL.
pub async fn spawn_json_upstream(body: Value) -> String {
    let app = Router::new().fallback(move || {
        let body = body.clone();
        async move { Json(body) }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream");
    let addr = listener.local_addr().expect("Upstream address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{}", addr)
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
