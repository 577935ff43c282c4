//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ask handler / http layer produce:
//!     → logging.rs (structured log events, JSON to stdout)
//!     → metrics.rs (questions_total counter, response_latency_ms histogram)
//!     → tracing.rs (ask_question spans, optionally exported over OTLP)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//!     → OTLP collector: spans and log records batched, metrics pushed
//!       every 5 s, all off the request path
//! ```
//!
//! # Design Decisions
//! - Everything is initialized once in `main`, before the listener binds
//! - Metric handles are built once and injected into the handler
//! - Exporters run on background tasks; handlers never wait on them

pub mod logging;
pub mod metrics;
pub mod tracing;

use thiserror::Error;

use crate::config::{ObservabilityConfig, ServiceConfig};

pub use self::metrics::QuestionMetrics;
pub use self::tracing::TelemetryGuard;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("failed to install log subscriber: {0}")]
    Logging(String),

    #[error("failed to start OTLP exporter: {0}")]
    Exporter(String),

    #[error("failed to install metrics recorder: {0}")]
    Metrics(String),
}

/// Install the log subscriber and, when enabled, the OTLP span, metric and
/// log exporters.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes pending telemetry. Call before any [`QuestionMetrics`] is built so
/// its OTel instruments bind to the exporting meter provider.
pub fn init(
    service: &ServiceConfig,
    config: &ObservabilityConfig,
) -> Result<TelemetryGuard, ObservabilityError> {
    let (tracer, logger, meter_provider) = if config.otlp_enabled {
        (
            Some(self::tracing::init_otlp_tracer(&service.name, &config.otlp_endpoint)?),
            Some(logging::init_otlp_logger(&service.name, &config.otlp_endpoint)?),
            Some(self::metrics::init_otlp_meter_provider(
                &service.name,
                &config.otlp_endpoint,
            )?),
        )
    } else {
        (None, None, None)
    };
    let guard = TelemetryGuard::new(tracer.is_some(), logger.is_some(), meter_provider);

    logging::init_logging(config, tracer, logger)?;

    ::tracing::info!(
        service = %service.name,
        otlp_enabled = guard.is_exporting(),
        otlp_endpoint = %config.otlp_endpoint,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(guard)
}
