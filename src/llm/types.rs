//! Wire types for the chat-completion API and the provider error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Any failure of a provider call. The handler collapses every variant into
/// one `llm_failed` response; the variants exist for logs.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No API key was configured.
    #[error("no API key configured for the completion provider")]
    MissingApiKey,

    /// The client timeout elapsed before a response arrived.
    #[error("provider request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection, TLS or other transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A success status whose body did not contain an answer.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub fn single_user_message(model: &'a str, content: &'a str) -> Self {
        Self {
            model,
            messages: [ChatMessage {
                role: "user",
                content,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice.
    pub fn into_answer(self) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("response has no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| ProviderError::Malformed("first choice has no content".to_string()))
    }
}

/// `{"error": {"message": ...}}` body returned alongside error statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}
