//! Distributed tracing support.
//!
//! # Responsibilities
//! - Build the OTLP span exporter (gRPC via tonic, batched on tokio)
//! - Shut the tracer, meter and logger providers down when the process exits
//! - Shape span attributes shared by handlers

use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::MeterProvider;
use opentelemetry_sdk::{trace as sdktrace, Resource};

use crate::observability::ObservabilityError;

/// Characters of the answer kept in the `response.answer_preview` attribute.
pub const ANSWER_PREVIEW_CHARS: usize = 50;

/// Resource attached to every exported span, metric and log record.
pub fn service_resource(service_name: &str) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", service_name.to_string()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ])
}

/// Build a batching OTLP tracer and register its provider globally.
pub fn init_otlp_tracer(
    service_name: &str,
    endpoint: &str,
) -> Result<sdktrace::Tracer, ObservabilityError> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(sdktrace::config().with_resource(service_resource(service_name)))
        .install_batch(opentelemetry_sdk::runtime::Tokio)
        .map_err(|e| ObservabilityError::Exporter(e.to_string()))
}

/// First [`ANSWER_PREVIEW_CHARS`] characters of `answer`, never splitting a
/// UTF-8 code point.
pub fn answer_preview(answer: &str) -> &str {
    match answer.char_indices().nth(ANSWER_PREVIEW_CHARS) {
        Some((idx, _)) => &answer[..idx],
        None => answer,
    }
}

/// Flushes and shuts down the OTLP providers on drop.
#[derive(Default)]
pub struct TelemetryGuard {
    tracing: bool,
    logging: bool,
    meter_provider: Option<MeterProvider>,
}

impl TelemetryGuard {
    pub fn new(tracing: bool, logging: bool, meter_provider: Option<MeterProvider>) -> Self {
        Self {
            tracing,
            logging,
            meter_provider,
        }
    }

    /// True when any signal is pushed to a collector.
    pub fn is_exporting(&self) -> bool {
        self.tracing || self.logging || self.meter_provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.meter_provider.take() {
            if let Err(e) = provider.shutdown() {
                ::tracing::warn!(error = %e, "Failed to flush metrics on shutdown");
            }
        }
        if self.logging {
            opentelemetry::global::shutdown_logger_provider();
        }
        if self.tracing {
            opentelemetry::global::shutdown_tracer_provider();
        }
    }
}
