//! In-process HTTP server returning a canned response.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A request seen by the stub.
#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    /// Path and query, as sent on the wire.
    pub uri: String,
    pub accept: Option<String>,
}

struct StubState {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    delay: Duration,
    hits: AtomicUsize,
    requests: Mutex<Vec<SeenRequest>>,
}

/// Stub upstream bound to `127.0.0.1` on an ephemeral port.
pub(crate) struct StubServer {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubServer {
    pub async fn xml(body: String) -> Self {
        Self::start(StatusCode::OK, "application/rss+xml", body, Duration::ZERO).await
    }

    pub async fn json(body: String) -> Self {
        Self::start(StatusCode::OK, "application/json", body, Duration::ZERO).await
    }

    pub async fn status(status: StatusCode) -> Self {
        Self::start(status, "text/plain", "upstream error".to_string(), Duration::ZERO).await
    }

    pub async fn slow(body: String, delay: Duration) -> Self {
        Self::start(StatusCode::OK, "application/json", body, delay).await
    }

    pub async fn start(
        status: StatusCode,
        content_type: &'static str,
        body: String,
        delay: Duration,
    ) -> Self {
        let state = Arc::new(StubState {
            status,
            content_type,
            body,
            delay,
            hits: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(respond)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Number of requests received.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<SeenRequest> {
        self.state.requests.lock().ok()?.last().cloned()
    }
}

async fn respond(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(SeenRequest {
            uri: uri.to_string(),
            accept: headers
                .get(header::ACCEPT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
    }

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [(header::CONTENT_TYPE, state.content_type)],
        state.body.clone(),
    )
}
