//! Mock image provider for integration tests
//!
//! Serves an OpenAI-style generation endpoint whose locator points back at
//! this same server, which then hands out fixed image bytes.

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing,
};
use tokio_util::sync::CancellationToken;

/// Bytes served for every successful image fetch
pub const IMAGE_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// How the mock should respond
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Both calls succeed
    Healthy,
    /// Generation returns 500
    FailGeneration,
    /// Generation succeeds, image fetch returns 404
    FailFetch,
    /// Generation returns 200 without `data[0].url`
    MissingUrl,
    /// Generation answers after the given delay
    SlowGeneration(Duration),
}

/// Mock provider that records how often each endpoint was hit
pub struct MockProvider {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    addr: SocketAddr,
    behavior: Behavior,
    generation_count: AtomicU32,
    fetch_count: AtomicU32,
}

impl MockProvider {
    /// Start a healthy mock
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Behavior::Healthy).await
    }

    pub async fn start_with(behavior: Behavior) -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockState {
            addr,
            behavior,
            generation_count: AtomicU32::new(0),
            fetch_count: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/v1/images/generations", routing::post(handle_generation))
            .route("/images/abc.png", routing::get(handle_image))
            .with_state(Arc::clone(&state));

        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the provider
    ///
    /// Includes `/v1` since the provider appends `/images/generations`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Locator the mock hands out
    pub fn image_url(&self) -> String {
        format!("http://{}/images/abc.png", self.addr)
    }

    pub fn generation_count(&self) -> u32 {
        self.state.generation_count.load(Ordering::Relaxed)
    }

    pub fn fetch_count(&self) -> u32 {
        self.state.fetch_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generation(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.generation_count.fetch_add(1, Ordering::Relaxed);

    let authorized = headers
        .get(header::AUTHORIZATION)
        .is_some_and(|v| v == "Bearer test-key");

    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing bearer credential").into_response();
    }

    if body["prompt"].as_str().is_none_or(str::is_empty) || body["n"] != 1 || body["response_format"] != "url" {
        return (StatusCode::BAD_REQUEST, "unexpected request body").into_response();
    }

    match state.behavior {
        Behavior::FailGeneration => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": {
                        "message": "mock provider intentional failure",
                        "type": "server_error"
                    }
                })),
            )
                .into_response();
        }
        Behavior::MissingUrl => {
            return Json(serde_json::json!({"created": 1_700_000_000, "data": [{}]})).into_response();
        }
        Behavior::SlowGeneration(delay) => tokio::time::sleep(delay).await,
        Behavior::Healthy | Behavior::FailFetch => {}
    }

    Json(serde_json::json!({
        "created": 1_700_000_000,
        "data": [{"url": format!("http://{}/images/abc.png", state.addr)}]
    }))
    .into_response()
}

async fn handle_image(State(state): State<Arc<MockState>>) -> Response {
    state.fetch_count.fetch_add(1, Ordering::Relaxed);

    if state.behavior == Behavior::FailFetch {
        return StatusCode::NOT_FOUND.into_response();
    }

    ([(header::CONTENT_TYPE, "image/png")], IMAGE_BYTES).into_response()
}
