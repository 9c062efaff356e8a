use std::time::Instant;

use figurine_config::GenerationConfig;
use figurine_core::{DataUrl, GenerateRequest, GenerateResponse, Locale};
use figurine_telemetry::GenerationMetrics;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    catalog::Catalog,
    classify::Reply,
    error::{GenerateError, Result},
    provider::{ImageModel, ModelError, google::GeminiModel},
    retry::{RetryError, RetryPolicy},
};

/// Stateless generation proxy
///
/// Holds only startup configuration; every call to `generate` is
/// independent of every other.
pub struct Generator {
    model: Box<dyn ImageModel>,
    default_credential: Option<SecretString>,
    retry: RetryPolicy,
    metrics: GenerationMetrics,
}

impl Generator {
    /// Build a generator around any image model
    pub fn new(model: Box<dyn ImageModel>, default_credential: Option<SecretString>, retry: RetryPolicy) -> Self {
        Self {
            model,
            default_credential,
            retry,
            metrics: GenerationMetrics::new(),
        }
    }

    /// Replace the metric instruments, e.g. with ones on a private meter
    #[must_use]
    pub fn with_metrics(mut self, metrics: GenerationMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Count a request turned away before it reached the pipeline
    pub fn reject(&self, error: GenerateError) -> GenerateError {
        self.metrics.record(error.outcome(), 0, Instant::now());
        error
    }

    /// Produce a figure for `request`
    ///
    /// Steps run in a fixed order: credential resolution, input validation,
    /// prompt construction, image decomposition, remote call with retry,
    /// reply classification.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let start = Instant::now();
        let mut attempts = 0;

        let result = self.run(request, &mut attempts).await;

        let outcome = result.as_ref().map_or_else(GenerateError::outcome, |_| "success");
        self.metrics.record(outcome, attempts, start);

        result
    }

    async fn run(&self, request: GenerateRequest, attempts: &mut u32) -> Result<GenerateResponse> {
        let GenerateRequest {
            image_data_url,
            name,
            language: locale,
            credential,
        } = request;

        let credential = self.resolve_credential(credential)?;

        if image_data_url.is_empty() || name.trim().is_empty() {
            return Err(GenerateError::InvalidInput("Missing imageDataUrl or name"));
        }

        let catalog = Catalog::for_locale(&locale);
        let prompt = catalog.prompt(&name);
        let image = DataUrl::parse(&image_data_url)?;

        tracing::info!(
            model = self.model.name(),
            %locale,
            mime_type = image.mime_type(),
            "generating figure"
        );

        let reply = self
            .retry
            .run(ModelError::is_transient, |attempt| {
                tracing::debug!(attempt, "calling image model");
                self.model.generate(&image, &prompt, &credential)
            })
            .await;

        let reply = match reply {
            Ok(retried) => {
                *attempts = retried.attempts;
                retried.value
            }
            Err(RetryError::Aborted { attempts: used, error }) => {
                *attempts = used;
                return Err(GenerateError::Upstream(error));
            }
            Err(RetryError::Exhausted { attempts: used, last }) => {
                *attempts = used;
                return Err(GenerateError::RetriesExhausted {
                    locale,
                    attempts: used,
                    last,
                });
            }
        };

        classified(reply, locale)
    }

    /// Request credential first, then the process default; blank counts as absent
    fn resolve_credential(&self, supplied: Option<SecretString>) -> Result<SecretString> {
        supplied
            .filter(|credential| !credential.expose_secret().trim().is_empty())
            .or_else(|| self.default_credential.clone())
            .ok_or(GenerateError::MissingCredential)
    }
}

fn classified(reply: Reply, locale: Locale) -> Result<GenerateResponse> {
    match reply {
        Reply::Image(image) => {
            tracing::info!(mime_type = image.mime_type(), "figure generated");
            Ok(GenerateResponse {
                image_url: image.to_string(),
            })
        }
        Reply::SafetyBlocked { reason } => Err(GenerateError::SafetyRejected { locale, reason }),
        Reply::TextOnly(text) => Err(GenerateError::TextOnlyReply { locale, text }),
    }
}

/// Builder wiring a `Generator` to the configured Gemini model
pub struct GeneratorBuilder<'a> {
    config: &'a GenerationConfig,
}

impl<'a> GeneratorBuilder<'a> {
    pub fn new(config: &'a GenerationConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Generator> {
        let model = GeminiModel::new(self.config)?;

        if self.config.api_key.is_none() {
            tracing::warn!("no default API key configured; requests must supply their own credential");
        }

        tracing::debug!(
            model = %self.config.model,
            max_attempts = self.config.retry.max_attempts,
            "generation proxy initialized"
        );

        Ok(Generator::new(
            Box::new(model),
            self.config.api_key.clone(),
            RetryPolicy::from(&self.config.retry),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::Catalog;
    use crate::testing::{ScriptedModel, internal_error, invalid_key_error};

    const PHOTO: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

    fn generator(model: ScriptedModel, default_credential: Option<&str>) -> Generator {
        Generator::new(
            Box::new(model),
            default_credential.map(SecretString::from),
            RetryPolicy::new(3, Duration::from_secs(1), 2),
        )
    }

    fn request(name: &str, locale: Locale) -> GenerateRequest {
        GenerateRequest {
            image_data_url: PHOTO.to_owned(),
            name: name.to_owned(),
            language: locale,
            credential: None,
        }
    }

    fn figure() -> Reply {
        Reply::Image(DataUrl::new("image/png", "iVBORw0KGgo="))
    }

    #[tokio::test]
    async fn generated_image_is_returned_as_data_url() {
        let model = ScriptedModel::new(vec![Ok(figure())]);
        let calls = model.calls();

        let response = generator(model, Some("server-key"))
            .generate(request("Kai", Locale::English))
            .await
            .unwrap();

        assert_eq!(response.image_url, "data:image/png;base64,iVBORw0KGgo=");

        let calls = calls.all();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].image.to_string(), PHOTO);
        assert_eq!(calls[0].prompt, Catalog::for_locale(&Locale::English).prompt("Kai"));
    }

    #[tokio::test]
    async fn prompt_follows_request_locale() {
        let model = ScriptedModel::new(vec![Ok(figure())]);
        let calls = model.calls();

        generator(model, Some("server-key"))
            .generate(request("Kai", Locale::Vietnamese))
            .await
            .unwrap();

        assert_eq!(calls.all()[0].prompt, Catalog::for_locale(&Locale::Vietnamese).prompt("Kai"));
    }

    #[tokio::test]
    async fn request_credential_overrides_server_default() {
        let model = ScriptedModel::new(vec![Ok(figure())]);
        let calls = model.calls();

        let mut req = request("Kai", Locale::English);
        req.credential = Some(SecretString::from("client-key"));
        generator(model, Some("server-key")).generate(req).await.unwrap();

        assert_eq!(calls.all()[0].credential, "client-key");
    }

    #[tokio::test]
    async fn blank_request_credential_falls_back_to_default() {
        let model = ScriptedModel::new(vec![Ok(figure())]);
        let calls = model.calls();

        let mut req = request("Kai", Locale::English);
        req.credential = Some(SecretString::from(""));
        generator(model, Some("server-key")).generate(req).await.unwrap();

        assert_eq!(calls.all()[0].credential, "server-key");
    }

    #[tokio::test]
    async fn server_default_used_when_request_has_none() {
        let model = ScriptedModel::new(vec![Ok(figure())]);
        let calls = model.calls();

        generator(model, Some("server-key"))
            .generate(request("Kai", Locale::English))
            .await
            .unwrap();

        assert_eq!(calls.all()[0].credential, "server-key");
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_call() {
        let model = ScriptedModel::new(vec![]);
        let calls = model.calls();

        let err = generator(model, None)
            .generate(request("Kai", Locale::English))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::MissingCredential));
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn credential_is_checked_before_input() {
        let model = ScriptedModel::new(vec![]);

        let err = generator(model, None)
            .generate(GenerateRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::MissingCredential));
    }

    #[tokio::test]
    async fn blank_name_or_image_is_invalid_input() {
        for req in [
            request("   ", Locale::English),
            GenerateRequest {
                image_data_url: String::new(),
                ..request("Kai", Locale::English)
            },
        ] {
            let model = ScriptedModel::new(vec![]);
            let calls = model.calls();

            let err = generator(model, Some("server-key")).generate(req).await.unwrap_err();

            assert_eq!(err.to_string(), "Missing imageDataUrl or name");
            assert_eq!(calls.count(), 0);
        }
    }

    #[tokio::test]
    async fn malformed_image_fails_before_any_call() {
        let model = ScriptedModel::new(vec![]);
        let calls = model.calls();

        let req = GenerateRequest {
            image_data_url: "data:text/plain;base64,aGk=".to_owned(),
            ..request("Kai", Locale::English)
        };
        let err = generator(model, Some("server-key")).generate(req).await.unwrap_err();

        assert!(matches!(err, GenerateError::MalformedImage(_)));
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_with_backoff() {
        let model = ScriptedModel::new(vec![Err(internal_error()), Err(internal_error()), Ok(figure())]);
        let calls = model.calls();

        let start = tokio::time::Instant::now();
        let response = generator(model, Some("server-key"))
            .generate(request("Kai", Locale::English))
            .await
            .unwrap();

        assert_eq!(response.image_url, "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(calls.count(), 3);
        // 1s after the first failure, 2s after the second
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert!(start.elapsed() < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_report_localized_message() {
        let model = ScriptedModel::new(vec![Err(internal_error()), Err(internal_error()), Err(internal_error())]);
        let calls = model.calls();

        let start = tokio::time::Instant::now();
        let err = generator(model, Some("server-key"))
            .generate(request("Kai", Locale::Vietnamese))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(err.to_string(), Catalog::for_locale(&Locale::Vietnamese).retries_exhausted);
        assert_eq!(calls.count(), 3);
        // no delay after the final attempt
        assert!(start.elapsed() < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_is_not_retried() {
        let model = ScriptedModel::new(vec![Err(invalid_key_error())]);
        let calls = model.calls();

        let start = tokio::time::Instant::now();
        let err = generator(model, Some("server-key"))
            .generate(request("Kai", Locale::English))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::Upstream(_)));
        assert!(err.to_string().contains("API key not valid"));
        assert_eq!(calls.count(), 1);
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test]
    async fn safety_block_is_localized() {
        let model = ScriptedModel::new(vec![Ok(Reply::SafetyBlocked {
            reason: "PROHIBITED_CONTENT".to_owned(),
        })]);

        let err = generator(model, Some("server-key"))
            .generate(request("Kai", Locale::English))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), Catalog::for_locale(&Locale::English).safety_filter);
    }

    #[tokio::test]
    async fn text_only_reply_quotes_model_text() {
        let model = ScriptedModel::new(vec![Ok(Reply::TextOnly("I can't do that.".to_owned()))]);

        let err = generator(model, Some("server-key"))
            .generate(request("Kai", Locale::Vietnamese))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            Catalog::for_locale(&Locale::Vietnamese).text_only("I can't do that.")
        );
    }

    #[test]
    fn builder_uses_configured_key() {
        let config = GenerationConfig {
            api_key: Some(SecretString::from("configured")),
            ..GenerationConfig::default()
        };

        let generator = GeneratorBuilder::new(&config).build().unwrap();

        assert_eq!(
            generator.default_credential.as_ref().map(|key| key.expose_secret()),
            Some("configured")
        );
        assert_eq!(generator.retry.max_attempts(), 3);
        assert_eq!(generator.model.name(), config.model);
    }
}
