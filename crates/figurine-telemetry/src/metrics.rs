//! Metric names and instruments for the generation proxy

use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram, Meter};

pub const GENERATION_COUNT: &str = "figurine.generation.count";
pub const GENERATION_DURATION: &str = "figurine.generation.duration";
pub const GENERATION_ATTEMPTS: &str = "figurine.generation.attempts";

/// Instruments recorded once per proxy invocation
///
/// Backed by the global meter provider; recording is a no-op until
/// `init` installs an exporting provider.
#[derive(Clone)]
pub struct GenerationMetrics {
    count: Counter<u64>,
    duration: Histogram<f64>,
    attempts: Histogram<u64>,
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self::with_meter(&opentelemetry::global::meter("figurine"))
    }

    /// Build the instruments on a specific meter instead of the global one
    pub fn with_meter(meter: &Meter) -> Self {
        Self {
            count: meter
                .u64_counter(GENERATION_COUNT)
                .with_description("Generation requests by outcome")
                .build(),
            duration: meter
                .f64_histogram(GENERATION_DURATION)
                .with_unit("s")
                .with_description("End-to-end generation latency")
                .build(),
            attempts: meter
                .u64_histogram(GENERATION_ATTEMPTS)
                .with_description("Remote model attempts per generation")
                .build(),
        }
    }

    /// Record the outcome of one invocation
    pub fn record(&self, outcome: &'static str, attempts: u32, start: Instant) {
        let attributes = [KeyValue::new("outcome", outcome)];

        self.count.add(1, &attributes);
        self.duration.record(start.elapsed().as_secs_f64(), &attributes);
        if attempts > 0 {
            self.attempts.record(u64::from(attempts), &attributes);
        }
    }
}

impl Default for GenerationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GenerationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationMetrics").finish_non_exhaustive()
    }
}
