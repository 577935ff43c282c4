//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Service identity reported by `/health` and telemetry resources.
    pub service: ServiceConfig,

    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Upstream chat-completion provider.
    pub llm: LlmConfig,

    /// Logging, tracing and metrics settings.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "simple-ai-agent".to_string(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port, overridable through `PORT`.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Chat-completion provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Bearer credential. Usually injected from `OPENAI_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// API root, without the `/chat/completions` suffix.
    pub base_url: String,

    /// Model identifier sent with every request.
    pub model: String,

    /// Whole-request timeout applied by the HTTP client.
    pub timeout_secs: u64,

    /// Honour `HTTP(S)_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 600,
            use_system_proxy: true,
        }
    }
}

// The key never reaches logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("use_system_proxy", &self.use_system_proxy)
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// Export spans to an OTLP collector.
    pub otlp_enabled: bool,

    /// OTLP gRPC endpoint (e.g., "http://localhost:4317").
    pub otlp_endpoint: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
            otlp_enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
        }
    }
}
