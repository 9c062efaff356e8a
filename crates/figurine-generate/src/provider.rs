pub(crate) mod google;

use async_trait::async_trait;
use figurine_core::DataUrl;
use reqwest::StatusCode;
use secrecy::SecretString;
use thiserror::Error;

use crate::classify::Reply;
use crate::protocol::GeminiErrorResponse;

/// Failure of a single remote model call
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// Remote API answered with a non-2xx status
    #[error("Gemini API error ({status} {code}): {message}")]
    Api {
        /// HTTP status of the response
        status: u16,
        /// Canonical status string from the error body (e.g. `INTERNAL`)
        code: String,
        /// Message from the error body, or the raw body
        message: String,
    },

    /// Request never produced a response (connect, DNS, timeout)
    #[error("Failed to reach the Gemini API: {0}")]
    Transport(String),

    /// 2xx response whose body could not be decoded
    #[error("Failed to decode the Gemini API response: {0}")]
    Decode(String),
}

impl ModelError {
    /// Build from a non-2xx response body
    ///
    /// Prefers the structured error envelope; falls back to the raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<GeminiErrorResponse>(body) {
            Ok(envelope) => {
                let detail = envelope.error;
                // A 5xx code in the body outranks a misleading HTTP status
                Self::Api {
                    status: status.as_u16().max(detail.code),
                    code: detail.status,
                    message: detail.message,
                }
            }
            Err(_) => Self::Api {
                status: status.as_u16(),
                code: status.canonical_reason().unwrap_or("UNKNOWN").to_owned(),
                message: if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body.trim().to_owned()
                },
            },
        }
    }

    /// Whether a retry may succeed
    ///
    /// Only server-side failures (5xx or an `INTERNAL` status) qualify;
    /// transport and decode failures are treated as permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => (500..600).contains(status) || code == "INTERNAL",
            Self::Transport(_) | Self::Decode(_) => false,
        }
    }
}

/// A remote model able to turn a photo plus instruction into an image
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Run one generation attempt and classify the reply
    async fn generate(
        &self,
        image: &DataUrl,
        prompt: &str,
        credential: &SecretString,
    ) -> Result<Reply, ModelError>;

    /// Model name used in logs
    fn name(&self) -> &str;
}
