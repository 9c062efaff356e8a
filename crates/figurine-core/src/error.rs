use http::StatusCode;

/// Trait for domain errors that can be converted to HTTP responses
///
/// The server layer renders these as `{ "error": <client_message> }`,
/// keeping domain errors decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error kind (e.g. `invalid_input`)
    fn error_kind(&self) -> &'static str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}
