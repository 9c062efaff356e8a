use std::time::Duration;

use serde::Deserialize;

use super::exporters::ExporterConfig;

/// Metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// How often accumulated metrics are pushed
    #[serde(default = "default_interval", deserialize_with = "duration_str::deserialize_duration")]
    pub export_interval: Duration,
    /// Override the shared exporter for metrics
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_interval() -> Duration {
    Duration::from_secs(30)
}
