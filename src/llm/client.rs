//! OpenAI-compatible chat-completion client.
//!
//! # Responsibilities
//! - Issue exactly one POST per question
//! - Map transport, status and decoding failures to `ProviderError`

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::llm::types::{ApiErrorBody, ChatRequest, ChatResponse, ProviderError};
use crate::llm::CompletionProvider;

/// reqwest-backed client for `{base_url}/chat/completions`.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let client = Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
        };

        tracing::info!(
            endpoint = %client.endpoint,
            model = %client.model,
            timeout_secs = client.timeout_secs,
            "Completion client initialized"
        );
        Ok(client)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, question: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&ChatRequest::single_user_message(&self.model, question))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_secs)
            } else {
                ProviderError::Malformed(e.to_string())
            }
        })?;

        body.into_answer()
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
