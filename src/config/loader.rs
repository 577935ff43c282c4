//! Configuration loading from disk and environment.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::AgentConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "AGENT_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Collector file {} is not valid JSON: {source}", .path.display())]
    Collector {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Environment variable {name}={value:?} is invalid")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shape of `~/.a2a/config.json`; only the collector endpoint is read.
#[derive(Debug, Default, Deserialize)]
struct CollectorFile {
    #[serde(default)]
    collector: Option<CollectorSection>,
}

#[derive(Debug, Default, Deserialize)]
struct CollectorSection {
    #[serde(rename = "endpointGrpc")]
    endpoint_grpc: Option<String>,
}

/// Load configuration the way the binary does: `$AGENT_CONFIG` (if set),
/// then `~/.a2a/config.json`, then the process environment.
pub fn load_from_env() -> Result<AgentConfig, ConfigError> {
    let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    load_config(path.as_deref())
}

/// Load and validate configuration, optionally starting from a TOML file.
pub fn load_config(path: Option<&Path>) -> Result<AgentConfig, ConfigError> {
    load_with(path, default_collector_path().as_deref(), |name| {
        std::env::var(name).ok()
    })
}

/// Layered load with injectable collector path and environment lookup.
pub fn load_with<F>(
    path: Option<&Path>,
    collector_path: Option<&Path>,
    env: F,
) -> Result<AgentConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => AgentConfig::default(),
    };

    if let Some(collector_path) = collector_path {
        apply_collector_file(&mut config, collector_path)?;
    }
    apply_env(&mut config, env)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn default_collector_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".a2a").join("config.json"))
}

fn apply_collector_file(config: &mut AgentConfig, path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Ok(());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CollectorFile =
        serde_json::from_str(&content).map_err(|source| ConfigError::Collector {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(endpoint) = file.collector.and_then(|c| c.endpoint_grpc) {
        config.observability.otlp_endpoint = with_scheme(&endpoint);
        config.observability.otlp_enabled = true;
    }
    Ok(())
}

fn apply_env<F>(config: &mut AgentConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = env("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
        config.llm.api_key = Some(key);
    }
    if let Some(port) = env("PORT") {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "PORT",
            value: port.clone(),
        })?;
    }
    if let Some(name) = env("SERVICE_NAME") {
        config.service.name = name;
    }
    if let Some(base_url) = env("OPENAI_BASE_URL") {
        config.llm.base_url = base_url;
    }
    if let Some(model) = env("OPENAI_MODEL") {
        config.llm.model = model;
    }
    if let Some(endpoint) = env("OTEL_EXPORTER_OTLP_ENDPOINT") {
        config.observability.otlp_endpoint = with_scheme(&endpoint);
        config.observability.otlp_enabled = true;
    }
    Ok(())
}

/// tonic needs a scheme; the collector file usually stores a bare `host:port`.
fn with_scheme(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    }
}
