use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or `Config::parse` fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// Expands `{{ env.VAR }}` placeholders, then deserializes and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if variable expansion, TOML parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// A missing default credential is deliberately not an error: requests
    /// may still carry their own, and those without one are rejected per request.
    ///
    /// # Errors
    ///
    /// Returns an error if the retry policy or model settings are unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_generation()?;
        self.validate_server()?;
        Ok(())
    }

    fn validate_generation(&self) -> anyhow::Result<()> {
        let generation = &self.generation;

        if generation.model.trim().is_empty() {
            anyhow::bail!("generation.model must not be empty");
        }

        if !matches!(generation.base_url.scheme(), "http" | "https") {
            anyhow::bail!("generation.base_url must be an http(s) URL");
        }

        if generation.retry.max_attempts == 0 {
            anyhow::bail!("generation.retry.max_attempts must be at least 1");
        }

        if generation.retry.multiplier == 0 {
            anyhow::bail!("generation.retry.multiplier must be at least 1");
        }

        if generation.request_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("generation.request_timeout must be greater than 0");
        }

        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let health = &self.server.health;

        if self.server.max_request_bytes == 0 {
            anyhow::bail!("server.max_request_bytes must be greater than 0");
        }

        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if health.enabled && health.path == figurine_core::GENERATE_PATH {
            anyhow::bail!("server.health.path collides with the generation endpoint");
        }

        Ok(())
    }
}
