//! Response bodies and error mapping.
//!
//! # Design Decisions
//! - Provider failures map to 500 with a fixed `llm_failed` body
//! - No error detail ever reaches the client

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::ask::{Answer, AskError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub latency_ms: u64,
}

impl From<Answer> for AskResponse {
    fn from(answer: Answer) -> Self {
        Self {
            answer: answer.text,
            latency_ms: answer.latency_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
}

impl IntoResponse for AskError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
