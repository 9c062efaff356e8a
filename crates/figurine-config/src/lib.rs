#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod generation;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use generation::*;
pub use health::*;
pub use server::*;
pub use telemetry::TelemetryConfig;

/// Top-level figurine configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote image model configuration
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
