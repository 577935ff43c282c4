//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file ($AGENT_CONFIG)
//!     → loader.rs (parse & deserialize, defaults for everything)
//!     → ~/.a2a/config.json (collector endpoint, if present)
//!     → environment overrides (OPENAI_API_KEY, PORT, ...)
//!     → validation.rs (semantic checks)
//!     → AgentConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults so the service runs with no file at all
//! - A missing API key is tolerated; the failure surfaces per request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AgentConfig;
pub use schema::{ListenerConfig, LlmConfig, ObservabilityConfig, ServiceConfig};
pub use validation::ValidationError;
