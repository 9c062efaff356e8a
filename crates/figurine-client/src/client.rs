use std::fmt;

use figurine_core::{ErrorBody, GENERATE_PATH, GenerateRequest, GenerateResponse, Locale};
use reqwest::StatusCode;
use secrecy::SecretString;
use url::Url;

use crate::error::{FigurineClientError, Result};

/// Typed client for the figurine generation proxy
#[derive(Clone)]
pub struct FigurineClient {
    base_url: Url,
    http: reqwest::Client,
    credential: Option<SecretString>,
}

impl fmt::Debug for FigurineClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FigurineClient")
            .field("base_url", &self.base_url)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl FigurineClient {
    /// Create a new client pointing at the proxy's base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| FigurineClientError::Config(format!("invalid base URL: {e}")))?;

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            credential: None,
        })
    }

    /// Send this Gemini API key with every request that lacks its own
    #[must_use]
    pub fn with_credential(mut self, credential: SecretString) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Get the base URL
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Generate a figure from a photo and return its data URL
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the proxy reports a failure
    pub async fn generate(&self, image_data_url: &str, name: &str, locale: Locale) -> Result<String> {
        let request = GenerateRequest {
            image_data_url: image_data_url.to_owned(),
            name: name.to_owned(),
            language: locale,
            credential: None,
        };

        let response = self.generate_with(&request).await?;

        Ok(response.image_url)
    }

    /// Send a fully specified generation request
    ///
    /// A credential on `request` takes precedence over the client's own.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the proxy reports a failure
    pub async fn generate_with(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = make_url(&self.base_url, GENERATE_PATH);

        let response = if request.credential.is_none()
            && let Some(credential) = &self.credential
        {
            let request = GenerateRequest {
                credential: Some(credential.clone()),
                ..request.clone()
            };
            self.http.post(url).json(&request).send().await?
        } else {
            self.http.post(url).json(request).send().await?
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FigurineClientError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        serde_json::from_str::<GenerateResponse>(&body)
            .map_err(|e| FigurineClientError::Decode(format!("unexpected response from server: {e}")))
    }
}

/// Build a full URL from base and path
fn make_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    url.set_path(path);
    url
}

/// Proxy-supplied `error` text, or a generic line naming the status
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error }) if !error.is_empty() => error,
        _ => format!(
            "Server error: {}",
            status.canonical_reason().unwrap_or_else(|| status.as_str())
        ),
    }
}
