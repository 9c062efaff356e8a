use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use url::Url;

/// Default Google Generative Language API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image-capable Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Remote image model configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Process-wide default credential, used when a request carries none
    ///
    /// An empty string counts as unset.
    #[serde(default, deserialize_with = "non_empty_secret")]
    pub api_key: Option<SecretString>,
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-attempt timeout for the remote call
    #[serde(default, deserialize_with = "duration_str::deserialize_option_duration")]
    pub request_timeout: Option<Duration>,
    /// Retry policy for transient remote failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            request_timeout: None,
            retry: RetryConfig::default(),
        }
    }
}

/// Bounded exponential backoff for transient remote failures
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    #[serde(default = "default_initial_delay", deserialize_with = "duration_str::deserialize_duration")]
    pub initial_delay: Duration,
    /// Factor applied to the delay after each further failure
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            multiplier: default_multiplier(),
        }
    }
}

fn non_empty_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|key| !key.trim().is_empty()).map(SecretString::from))
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("valid default URL")
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_attempts() -> u32 {
    3
}

#[allow(clippy::missing_const_for_fn)]
fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

#[allow(clippy::missing_const_for_fn)]
fn default_multiplier() -> u32 {
    2
}
