//! Google Generative Language API image model

use async_trait::async_trait;
use figurine_config::GenerationConfig;
use figurine_core::DataUrl;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ImageModel, ModelError};
use crate::classify::Reply;
use crate::protocol::{GeminiRequest, GeminiResponse};

/// Header carrying the API key, kept out of the URL so it never reaches logs
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini model reached over `generateContent`
pub(crate) struct GeminiModel {
    client: Client,
    base_url: Url,
    model: String,
}

impl GeminiModel {
    /// Create from generation configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(config: &GenerationConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build Gemini HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    /// `generateContent` endpoint for the configured model
    fn generate_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/models/{}:generateContent", self.model)
    }
}

#[async_trait]
impl ImageModel for GeminiModel {
    async fn generate(
        &self,
        image: &DataUrl,
        prompt: &str,
        credential: &SecretString,
    ) -> Result<Reply, ModelError> {
        let wire_request = GeminiRequest::image_edit(image, prompt);
        let url = self.generate_url();

        tracing::debug!(model = %self.model, mime_type = image.mime_type(), "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, credential.expose_secret())
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %self.model, error = %e, "Gemini request failed");
                ModelError::Transport(e.without_url().to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!(model = %self.model, %status, error = %e, "failed to read Gemini error body");
                String::new()
            });
            let error = ModelError::from_response(status, &body);

            tracing::warn!(
                model = %self.model,
                status = %status,
                transient = error.is_transient(),
                "Gemini returned error"
            );

            return Err(error);
        }

        let wire_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!(model = %self.model, error = %e, "failed to parse Gemini response");
            ModelError::Decode(e.without_url().to_string())
        })?;

        let reply = Reply::from(&wire_response);

        tracing::debug!(
            model = %self.model,
            finish_reason = wire_response.first_candidate().and_then(|c| c.finish_reason.as_deref()),
            image = matches!(reply, Reply::Image(_)),
            "Gemini request complete"
        );

        Ok(reply)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
