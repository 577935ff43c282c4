//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the metrics recorder before any metric handle exists
//! - Build the completion client and the ask handler
//! - Bind the listener and serve until shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::ask::AskHandler;
use crate::config::AgentConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::llm::{OpenAiClient, ProviderError};
use crate::observability::metrics::init_metrics;
use crate::observability::{ObservabilityError, QuestionMetrics};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error("failed to build completion client: {0}")]
    Provider(#[from] ProviderError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Wire the ask handler to its provider and metric instruments.
///
/// Installs the global Prometheus recorder when metrics are enabled, so call
/// it once per process.
pub fn build_handler(config: &AgentConfig) -> Result<Arc<AskHandler>, StartupError> {
    let obs = &config.observability;
    if obs.metrics_enabled {
        let addr: SocketAddr = obs.metrics_address.parse().map_err(|_| {
            ObservabilityError::Metrics(format!("invalid metrics address '{}'", obs.metrics_address))
        })?;
        init_metrics(addr)?;
    }

    if config.llm.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; every /ask call will fail with llm_failed");
    }

    let provider = OpenAiClient::new(&config.llm)?;
    let handler = AskHandler::new(Arc::new(provider), QuestionMetrics::register());
    Ok(Arc::new(handler))
}

/// Bind the configured listener and serve until `shutdown` fires.
pub async fn serve(config: AgentConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let handler = build_handler(&config)?;

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(
        address = %address,
        service = %config.service.name,
        model = %config.llm.model,
        "Listening for connections"
    );

    HttpServer::new(&config, handler)
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
