//! Per-question orchestration.

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{field, Instrument};

use crate::llm::CompletionProvider;
use crate::observability::metrics::QuestionMetrics;
use crate::observability::tracing::answer_preview;

/// A provider answer and the time it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub latency_ms: u64,
}

/// Failure surfaced to callers. Provider detail stays in logs and spans.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AskError {
    #[error("llm_failed")]
    LlmFailed,
}

/// Runs one question through the provider while recording telemetry.
pub struct AskHandler {
    provider: Arc<dyn CompletionProvider>,
    metrics: QuestionMetrics,
}

impl AskHandler {
    pub fn new(provider: Arc<dyn CompletionProvider>, metrics: QuestionMetrics) -> Self {
        Self { provider, metrics }
    }

    /// Answer `question`.
    ///
    /// The `ask_question` span is closed before this returns, and exactly one
    /// counter increment and latency sample are recorded, whatever the
    /// provider does.
    pub async fn ask(&self, question: &str) -> Result<Answer, AskError> {
        let span = tracing::info_span!(
            "ask_question",
            user.question = %question,
            response.latency_ms = field::Empty,
            response.answer_preview = field::Empty,
            otel.status_code = field::Empty,
        );

        async {
            let start = Instant::now();
            tracing::info!(
                event = "question_received",
                question = %question,
                "Received question"
            );

            let result = self.provider.complete(question).await;

            let elapsed = start.elapsed();
            self.metrics.record(elapsed);

            match result {
                Ok(text) => {
                    let latency_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                    span.record("response.latency_ms", latency_ms);
                    span.record("response.answer_preview", answer_preview(&text));

                    tracing::info!(
                        event = "answer_produced",
                        latency_ms,
                        "Answer produced in {:.2} ms",
                        elapsed.as_secs_f64() * 1000.0
                    );
                    Ok(Answer { text, latency_ms })
                }
                Err(err) => {
                    span.record("otel.status_code", "ERROR");

                    // Error-typed fields become `exception.*` attributes on
                    // the OTel event and span.
                    tracing::error!(
                        event = "openai_error",
                        error = &err as &(dyn std::error::Error + 'static),
                        "OpenAI call failed"
                    );
                    Err(AskError::LlmFailed)
                }
            }
        }
        .instrument(span.clone())
        .await
    }
}
