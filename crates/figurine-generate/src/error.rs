use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use figurine_core::{DataUrlError, ErrorBody, HttpError, Locale};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::provider::ModelError;

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Every way a generation request can fail
///
/// Each variant maps to exactly one HTTP status and an `{ "error" }` body.
/// Variants produced by response classification carry the request locale.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Anything but POST
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Body is not a JSON object of the expected shape
    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    /// Body could not be read, e.g. it exceeds the configured size limit
    #[error("{message}")]
    BodyRejected { status: StatusCode, message: String },

    /// Required field missing or blank
    #[error("{0}")]
    InvalidInput(&'static str),

    /// Neither the request nor the server supplies a credential
    #[error("Gemini API key is not configured. Please provide one or set it in the server environment.")]
    MissingCredential,

    /// Source image is not an image data URL
    #[error(transparent)]
    MalformedImage(#[from] DataUrlError),

    /// Remote model failed with a non-transient error
    #[error("{0}")]
    Upstream(ModelError),

    /// Every attempt failed with a transient error
    #[error("{}", Catalog::for_locale(.locale).retries_exhausted)]
    RetriesExhausted {
        locale: Locale,
        attempts: u32,
        last: ModelError,
    },

    /// Remote model refused on content-policy grounds
    #[error("{}", Catalog::for_locale(.locale).safety_filter)]
    SafetyRejected { locale: Locale, reason: String },

    /// Remote model replied with text and no image
    #[error("{}", Catalog::for_locale(.locale).text_only(.text))]
    TextOnlyReply { locale: Locale, text: String },
}

impl GenerateError {
    /// Outcome label recorded in metrics
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed
            | Self::MalformedBody(_)
            | Self::BodyRejected { .. }
            | Self::InvalidInput(_)
            | Self::MissingCredential
            | Self::MalformedImage(_) => "rejected",
            Self::Upstream(_) => "upstream_error",
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::SafetyRejected { .. } => "safety_blocked",
            Self::TextOnlyReply { .. } => "text_only",
        }
    }
}

impl HttpError for GenerateError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BodyRejected { status, .. } => *status,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::MalformedBody(_)
            | Self::MissingCredential
            | Self::MalformedImage(_)
            | Self::Upstream(_)
            | Self::RetriesExhausted { .. }
            | Self::SafetyRejected { .. }
            | Self::TextOnlyReply { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_kind(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method_not_allowed",
            Self::MalformedBody(_) => "malformed_body",
            Self::BodyRejected { .. } => "body_rejected",
            Self::InvalidInput(_) => "invalid_input",
            Self::MissingCredential => "configuration_error",
            Self::MalformedImage(_) => "malformed_image_payload",
            Self::Upstream(_) => "upstream_error",
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::SafetyRejected { .. } => "safety_rejected",
            Self::TextOnlyReply { .. } => "text_only_reply",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(kind = self.error_kind(), error = %self, "generation failed");
        } else {
            tracing::debug!(kind = self.error_kind(), error = %self, "generation request rejected");
        }

        let body = ErrorBody {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}
