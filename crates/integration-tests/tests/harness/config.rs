//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::time::Duration;

use figurine_config::{Config, CorsConfig, GenerationConfig, HealthConfig, RetryConfig, ServerConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal defaults pointed at a mock Gemini backend
    ///
    /// Retries keep the production shape but with millisecond delays.
    pub fn new(gemini_base_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                generation: GenerationConfig {
                    api_key: Some(SecretString::from("server-key")),
                    base_url: gemini_base_url.parse().expect("valid URL"),
                    retry: RetryConfig {
                        max_attempts: 3,
                        initial_delay: Duration::from_millis(10),
                        multiplier: 2,
                    },
                    ..GenerationConfig::default()
                },
                telemetry: None,
            },
        }
    }

    /// Remove the server-side default credential
    pub fn without_api_key(mut self) -> Self {
        self.config.generation.api_key = None;
        self
    }

    /// Set the initial retry delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.config.generation.retry.initial_delay = delay;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Cap the request body size
    pub fn with_max_request_bytes(mut self, limit: usize) -> Self {
        self.config.server.max_request_bytes = limit;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
