//! Metrics collection and exposition.
//!
//! # Metrics
//! - `questions_total` (counter): one increment per `/ask` call
//! - `response_latency_ms` (histogram): provider round-trip in milliseconds
//!
//! # Exposition
//! - Prometheus scrape listener (default)
//! - OTLP push every [`OTLP_EXPORT_INTERVAL`] when a collector is configured
//!
//! # Design Decisions
//! - Prometheus recorder installed globally before any handle is built
//! - OTLP meter provider installed globally before any handle is built
//! - Handles are resolved once, so the hot path is an atomic update

use metrics::{counter, describe_counter, describe_histogram, histogram, Counter, Histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use opentelemetry::metrics::{Counter as OtelCounter, Histogram as OtelHistogram, Meter};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::MeterProvider;
use std::net::SocketAddr;
use std::time::Duration;

use crate::observability::tracing::service_resource;
use crate::observability::ObservabilityError;

pub const QUESTIONS_TOTAL: &str = "questions_total";
pub const RESPONSE_LATENCY_MS: &str = "response_latency_ms";

/// Instrumentation scope of the OTel instruments.
pub const METER_NAME: &str = "qa-agent";

/// Period of the OTLP metric reader.
pub const OTLP_EXPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), ObservabilityError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ObservabilityError::Metrics(e.to_string()))?;

    describe_counter!(QUESTIONS_TOTAL, "Questions handled by the ask endpoint");
    describe_histogram!(
        RESPONSE_LATENCY_MS,
        Unit::Milliseconds,
        "Time spent waiting on the completion provider"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Build a periodic OTLP metric pipeline and register its provider globally.
///
/// Must run inside the tokio runtime; the reader exports on a background task.
pub fn init_otlp_meter_provider(
    service_name: &str,
    endpoint: &str,
) -> Result<MeterProvider, ObservabilityError> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    opentelemetry_otlp::new_pipeline()
        .metrics(opentelemetry_sdk::runtime::Tokio)
        .with_exporter(exporter)
        .with_resource(service_resource(service_name))
        .with_period(OTLP_EXPORT_INTERVAL)
        .build()
        .map_err(|e| ObservabilityError::Exporter(e.to_string()))
}

/// Per-question instruments, injected into the ask handler.
///
/// Every sample goes to both the `metrics` recorder (Prometheus) and the
/// OTel meter (OTLP). Either side is a no-op when it was never installed.
#[derive(Clone)]
pub struct QuestionMetrics {
    questions: Counter,
    latency_ms: Histogram,
    otel_questions: OtelCounter<u64>,
    otel_latency_ms: OtelHistogram<f64>,
}

impl QuestionMetrics {
    /// Resolve handles against the installed recorder and global meter provider.
    pub fn register() -> Self {
        Self::with_meter(&opentelemetry::global::meter(METER_NAME))
    }

    /// Resolve handles against the installed recorder and `meter`.
    pub fn with_meter(meter: &Meter) -> Self {
        Self {
            questions: counter!(QUESTIONS_TOTAL),
            latency_ms: histogram!(RESPONSE_LATENCY_MS),
            otel_questions: meter
                .u64_counter(QUESTIONS_TOTAL)
                .with_description("Questions handled by the ask endpoint")
                .init(),
            otel_latency_ms: meter
                .f64_histogram(RESPONSE_LATENCY_MS)
                .with_description("Time spent waiting on the completion provider")
                .with_unit(opentelemetry::metrics::Unit::new("ms"))
                .init(),
        }
    }

    /// Count one question and sample its latency.
    pub fn record(&self, latency: Duration) {
        let latency_ms = latency.as_secs_f64() * 1000.0;

        self.questions.increment(1);
        self.latency_ms.record(latency_ms);

        self.otel_questions.add(1, &[]);
        self.otel_latency_ms.record(latency_ms, &[]);
    }
}
