//! Question answering: the path behind `POST /ask`.
//!
//! # Data Flow
//! ```text
//! question
//!     → handler.rs (open span, log receipt)
//!     → CompletionProvider::complete (the single await point)
//!     → QuestionMetrics::record (counter + latency, both outcomes)
//!     → span attributes + outcome log
//!     → Answer | AskError::LlmFailed
//! ```

pub mod handler;

pub use handler::{Answer, AskError, AskHandler};
