//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AgentConfig → Result<(), Vec<ValidationError>>
//! - The API key is not checked; its absence is a per-request failure

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AgentConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("llm.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

pub fn validate_config(config: &AgentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ValidationError::Empty("service.name"));
    }
    if config.llm.model.trim().is_empty() {
        errors.push(ValidationError::Empty("llm.model"));
    }
    if config.llm.base_url.trim().is_empty() {
        errors.push(ValidationError::Empty("llm.base_url"));
    }
    if config.llm.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(obs.metrics_address.clone()));
    }
    if obs.otlp_enabled && obs.otlp_endpoint.trim().is_empty() {
        errors.push(ValidationError::Empty("observability.otlp_endpoint"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
