//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the `/ask` and `/health` handlers
//! - Wire up middleware (request ID, trace spans)
//! - Bind server to listener and drain on shutdown

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::ask::{AskError, AskHandler};
use crate::config::AgentConfig;
use crate::http::request::{request_span, AskRequest, UuidRequestId};
use crate::http::response::{AskResponse, HealthResponse};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<AskHandler>,
    pub service_name: Arc<str>,
}

/// HTTP front end of the agent.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &AgentConfig, handler: Arc<AskHandler>) -> Self {
        let state = AppState {
            handler,
            service_name: Arc::from(config.service.name.as_str()),
        };

        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/ask", post(ask_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(request_span))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AskError> {
    let answer = state.handler.ask(&request.text).await?;
    Ok(Json(answer.into()))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    tracing::info!(event = "health_check", "Health check OK");
    Json(HealthResponse {
        ok: true,
        service: state.service_name.to_string(),
    })
}
