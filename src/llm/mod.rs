//! Chat-completion provider integration.
//!
//! # Data Flow
//! ```text
//! question text
//!     → CompletionProvider::complete (one request, no history)
//!     → client.rs (POST {base_url}/chat/completions, bearer auth)
//!     → types.rs (wire format, ProviderError)
//!     → answer text
//! ```
//!
//! # Security Constraints
//! - The API key lives only in the client; it is never logged
//! - Every call is bounded by the configured client timeout

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::OpenAiClient;
pub use types::ProviderError;

/// A source of answers for single user questions.
///
/// Implementations are stateless across calls: each question is sent as a
/// lone user message.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, question: &str) -> Result<String, ProviderError>;
}
