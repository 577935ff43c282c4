//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level
//! - With a collector configured, every event is also shipped as an OTLP
//!   log record, correlated with the span it was emitted in

use opentelemetry::logs::{AnyValue, LogRecord, Logger, Severity};
use opentelemetry::trace::{SpanContext, TraceContextExt, TraceFlags, TraceState};
use opentelemetry::Key;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::Tracer;
use std::fmt;
use std::time::SystemTime;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_opentelemetry::OtelData;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::observability::tracing::service_resource;
use crate::observability::ObservabilityError;

/// Install the global subscriber.
///
/// `tracer` bridges spans to OTLP and `logger` bridges events to OTLP log
/// records; either may be absent.
pub fn init_logging(
    config: &ObservabilityConfig,
    tracer: Option<Tracer>,
    logger: Option<opentelemetry_sdk::logs::Logger>,
) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let otel_layer = tracer.map(|tracer| {
        tracing_opentelemetry::layer()
            .with_tracer(tracer)
            .with_exception_fields(true)
            .with_exception_field_propagation(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(logger.map(OtelLogLayer::new))
        .with(fmt_layer(config.json_logs, std::io::stdout))
        .try_init()
        .map_err(|e| ObservabilityError::Logging(e.to_string()))
}

/// Console layer writing to `writer`: one JSON object per line, or the
/// human-readable format.
pub fn fmt_layer<S, W>(json: bool, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        tracing_fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(writer)
            .boxed()
    } else {
        tracing_fmt::layer()
            .with_target(true)
            .with_writer(writer)
            .boxed()
    }
}

/// Build a batching OTLP log pipeline and register its provider globally.
pub fn init_otlp_logger(
    service_name: &str,
    endpoint: &str,
) -> Result<opentelemetry_sdk::logs::Logger, ObservabilityError> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    opentelemetry_otlp::new_pipeline()
        .logging()
        .with_log_config(
            opentelemetry_sdk::logs::config().with_resource(service_resource(service_name)),
        )
        .with_exporter(exporter)
        .install_batch(opentelemetry_sdk::runtime::Tokio)
        .map_err(|e| ObservabilityError::Exporter(e.to_string()))
}

/// Forwards tracing events to an OpenTelemetry [`Logger`].
pub struct OtelLogLayer<L> {
    logger: L,
}

impl<L> OtelLogLayer<L> {
    pub fn new(logger: L) -> Self {
        Self { logger }
    }
}

impl<S, L> Layer<S> for OtelLogLayer<L>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    L: Logger + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut fields = RecordFields::default();
        event.record(&mut fields);

        let now = SystemTime::now();
        let mut builder = LogRecord::builder()
            .with_timestamp(now)
            .with_observed_timestamp(now)
            .with_severity_number(severity(meta.level()))
            .with_severity_text(meta.level().as_str())
            .with_attributes(fields.attributes)
            .with_attribute("target", meta.target().to_string());

        if let Some(body) = fields.body {
            builder = builder.with_body(AnyValue::from(body));
        }
        if let Some(span_context) = event_span_context(event, &ctx) {
            builder = builder.with_span_context(&span_context);
        }

        self.logger.emit(builder.build());
    }
}

fn severity(level: &Level) -> Severity {
    match *level {
        Level::TRACE => Severity::Trace,
        Level::DEBUG => Severity::Debug,
        Level::INFO => Severity::Info,
        Level::WARN => Severity::Warn,
        Level::ERROR => Severity::Error,
    }
}

/// Span and trace ids the OTel span layer assigned to the event's span.
fn event_span_context<S>(event: &Event<'_>, ctx: &Context<'_, S>) -> Option<SpanContext>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let span = ctx.event_span(event)?;
    let extensions = span.extensions();
    let data = extensions.get::<OtelData>()?;
    let span_id = data.builder.span_id?;
    let trace_id = data
        .builder
        .trace_id
        .unwrap_or_else(|| data.parent_cx.span().span_context().trace_id());

    Some(SpanContext::new(
        trace_id,
        span_id,
        TraceFlags::SAMPLED,
        false,
        TraceState::default(),
    ))
}

#[derive(Default)]
struct RecordFields {
    body: Option<String>,
    attributes: Vec<(Key, AnyValue)>,
}

impl RecordFields {
    fn push(&mut self, field: &Field, value: AnyValue) {
        self.attributes.push((Key::new(field.name()), value));
    }
}

impl Visit for RecordFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.body = Some(value.to_string());
        } else {
            self.push(field, AnyValue::from(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, AnyValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let value = i64::try_from(value)
            .map(AnyValue::from)
            .unwrap_or_else(|_| AnyValue::from(value.to_string()));
        self.push(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, AnyValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, AnyValue::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, AnyValue::from(value.to_string()));
        self.attributes.push((
            Key::new("exception.message"),
            AnyValue::from(value.to_string()),
        ));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.body = Some(format!("{:?}", value));
        } else {
            self.push(field, AnyValue::from(format!("{:?}", value)));
        }
    }
}
