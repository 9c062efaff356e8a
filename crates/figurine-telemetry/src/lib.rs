//! Telemetry for figurine
//!
//! Structured logging through `tracing`, with optional OTLP export of
//! traces and metrics

mod metadata;
pub mod metrics;

use std::time::Duration;

use figurine_config::TelemetryConfig;
use figurine_config::telemetry::exporters::{ExportProtocol, ExporterConfig};
use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;

pub use metrics::GenerationMetrics;

/// Keeps exporters alive; flushes and shuts them down on drop
#[must_use = "telemetry is torn down when the guard is dropped"]
pub struct TelemetryGuard {
    meter_provider: Option<SdkMeterProvider>,
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.meter_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown meter provider: {e}");
        }
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Install the global `tracing` subscriber
///
/// Always logs to stdout through the fmt layer filtered by `log_filter`.
/// When the config names an exporter, spans and metrics are also shipped
/// over OTLP.
///
/// # Errors
///
/// Returns an error if an OTLP exporter cannot be built
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<TelemetryGuard> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let mut guard = TelemetryGuard {
        meter_provider: None,
        tracer_provider: None,
    };

    let otel_layer = match config {
        Some(telemetry) if telemetry.has_exporter() => {
            let resource = metadata::build_resource(telemetry);

            if let Some(meter_provider) = init_metrics(telemetry, resource.clone())? {
                global::set_meter_provider(meter_provider.clone());
                guard.meter_provider = Some(meter_provider);
            }

            match init_tracer(telemetry, resource)? {
                Some(tracer_provider) => {
                    let tracer = tracer_provider.tracer("figurine");
                    global::set_tracer_provider(tracer_provider.clone());
                    guard.tracer_provider = Some(tracer_provider);
                    Some(tracing_opentelemetry::layer().with_tracer(tracer))
                }
                None => None,
            }
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

fn metrics_exporter(config: &TelemetryConfig) -> Option<&ExporterConfig> {
    config
        .metrics
        .as_ref()
        .and_then(|m| m.exporter.as_ref())
        .or(config.exporter.as_ref())
}

fn trace_exporter(config: &TelemetryConfig) -> Option<&ExporterConfig> {
    config
        .tracing
        .as_ref()
        .and_then(|t| t.exporter.as_ref())
        .or(config.exporter.as_ref())
}

fn init_metrics(
    config: &TelemetryConfig,
    resource: opentelemetry_sdk::Resource,
) -> anyhow::Result<Option<SdkMeterProvider>> {
    use opentelemetry_otlp::MetricExporter;
    use opentelemetry_sdk::metrics::PeriodicReader;

    let Some(exporter_config) = metrics_exporter(config) else {
        return Ok(None);
    };

    let exporter = match exporter_config.protocol {
        ExportProtocol::Grpc => MetricExporter::builder()
            .with_tonic()
            .with_endpoint(exporter_config.endpoint.as_str())
            .build(),
        ExportProtocol::HttpProto => MetricExporter::builder()
            .with_http()
            .with_endpoint(exporter_config.endpoint.as_str())
            .build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build metrics exporter: {e}"))?;

    let interval = config
        .metrics
        .as_ref()
        .map_or(Duration::from_secs(30), |m| m.export_interval);

    let reader = PeriodicReader::builder(exporter).with_interval(interval).build();

    Ok(Some(
        SdkMeterProvider::builder()
            .with_resource(resource)
            .with_reader(reader)
            .build(),
    ))
}

fn init_tracer(
    config: &TelemetryConfig,
    resource: opentelemetry_sdk::Resource,
) -> anyhow::Result<Option<SdkTracerProvider>> {
    use opentelemetry_otlp::SpanExporter;
    use opentelemetry_sdk::trace::Sampler;

    let Some(exporter_config) = trace_exporter(config) else {
        return Ok(None);
    };

    let exporter = match exporter_config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(exporter_config.endpoint.as_str())
            .build(),
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(exporter_config.endpoint.as_str())
            .build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build span exporter: {e}"))?;

    let sampling_rate = config.tracing.as_ref().map_or(1.0, |t| t.sampling_rate);

    let sampler = if sampling_rate >= 1.0 {
        Sampler::AlwaysOn
    } else if sampling_rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(sampling_rate)
    };

    let sampler = if config.tracing.as_ref().is_none_or(|t| t.parent_based) {
        Sampler::ParentBased(Box::new(sampler))
    } else {
        sampler
    };

    Ok(Some(
        SdkTracerProvider::builder()
            .with_resource(resource)
            .with_sampler(sampler)
            .with_batch_exporter(exporter)
            .build(),
    ))
}
