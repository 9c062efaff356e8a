/// Client-specific result type
pub type Result<T> = std::result::Result<T, FigurineClientError>;

/// Errors from the figurine client
///
/// Every message is ready to show to an end user as-is.
#[derive(Debug, thiserror::Error)]
pub enum FigurineClientError {
    /// Request never produced a response
    #[error("The AI model failed to create an image. Details: {0}")]
    Network(#[from] reqwest::Error),

    /// Proxy answered with a non-success status
    #[error("The AI model failed to create an image. Details: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Proxy-supplied error text, or a generic server error line
        message: String,
    },

    /// Success response without a usable `imageUrl`
    #[error("The AI model failed to create an image. Details: {0}")]
    Decode(String),

    /// Invalid client configuration
    #[error("The AI model failed to create an image. Details: invalid configuration: {0}")]
    Config(String),
}
