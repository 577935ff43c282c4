//! Question-answering agent: a small HTTP service that forwards each
//! question to a chat-completion provider and records logs, traces and
//! metrics along the way.
//!
//! # Architecture Overview
//!
//! ```text
//!   POST /ask ──▶ http::server ──▶ ask::AskHandler ──▶ llm::OpenAiClient ──▶ provider
//!   GET /health ─┘       │                │
//!                        ▼                ▼
//!                 request id +     observability
//!                 request span     (logs, spans, metrics)
//! ```

pub mod ask;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod llm;
pub mod observability;

pub use ask::{Answer, AskError, AskHandler};
pub use config::AgentConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use llm::{CompletionProvider, OpenAiClient, ProviderError};
