//! Mock Gemini backend for integration tests
//!
//! Serves `generateContent` from a script of canned replies and records
//! every request it receives.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// One canned reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Candidate with a commentary text part and an inline image part
    Image { mime_type: String, data: String },
    /// Candidate with text parts only
    Text(String),
    /// Candidate stopped with the given finish reason and no content
    Finished(String),
    /// No candidates; prompt blocked with the given reason
    PromptBlocked(String),
    /// Gemini-style error envelope
    Error { status: StatusCode, code: u16, reason: String, message: String },
    /// Arbitrary body with the given status
    Raw { status: StatusCode, body: String },
}

impl MockReply {
    pub fn png(data: &str) -> Self {
        Self::Image {
            mime_type: "image/png".to_owned(),
            data: data.to_owned(),
        }
    }

    /// Transient failure as Gemini reports overload
    pub fn internal() -> Self {
        Self::Error {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: 500,
            reason: "INTERNAL".to_owned(),
            message: "An internal error has occurred. Please retry.".to_owned(),
        }
    }

    /// Permanent failure as Gemini reports a bad key
    pub fn invalid_key() -> Self {
        Self::Error {
            status: StatusCode::BAD_REQUEST,
            code: 400,
            reason: "INVALID_ARGUMENT".to_owned(),
            message: "API key not valid. Please pass a valid API key.".to_owned(),
        }
    }
}

impl IntoResponse for MockReply {
    fn into_response(self) -> Response {
        match self {
            Self::Image { mime_type, data } => Json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [
                            {"text": "Here is your figure."},
                            {"inlineData": {"mimeType": mime_type, "data": data}}
                        ]
                    },
                    "finishReason": "STOP"
                }]
            }))
            .into_response(),
            Self::Text(text) => Json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": text}]},
                    "finishReason": "STOP"
                }]
            }))
            .into_response(),
            Self::Finished(reason) => Json(json!({
                "candidates": [{"finishReason": reason}]
            }))
            .into_response(),
            Self::PromptBlocked(reason) => Json(json!({
                "promptFeedback": {"blockReason": reason}
            }))
            .into_response(),
            Self::Error {
                status,
                code,
                reason,
                message,
            } => (
                status,
                Json(json!({
                    "error": {"code": code, "message": message, "status": reason}
                })),
            )
                .into_response(),
            Self::Raw { status, body } => (status, body).into_response(),
        }
    }
}

/// Request as observed by the mock
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Last path segment, e.g. `gemini-x:generateContent`
    pub model_action: String,
    pub api_key: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Default)]
struct MockState {
    script: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<Recorded>>,
}

/// Mock Gemini server; replies with a small PNG once the script runs out
pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockGemini {
    /// Start a mock that always returns an image
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Vec::new()).await
    }

    /// Start a mock that plays `script` in order
    pub async fn start_with(script: Vec<MockReply>) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            script: Mutex::new(script.into()),
            requests: Mutex::default(),
        });

        let app = Router::new()
            .route("/v1beta/models/{model_action}", routing::post(handle_generate))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
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

    /// Base URL for `generation.base_url`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Number of `generateContent` calls received
    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate(
    State(state): State<Arc<MockState>>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    state.requests.lock().unwrap().push(Recorded {
        model_action,
        api_key,
        body,
    });

    let reply = state
        .script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| MockReply::png("iVBORw0KGgoAAAANSUhEUg=="));

    reply.into_response()
}
