//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routes, middleware)
//!     → request.rs (request ID, request span, body types)
//!     → ask handler / health
//!     → response.rs (JSON bodies, error mapping)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{AskRequest, UuidRequestId, X_REQUEST_ID};
pub use response::{AskResponse, ErrorResponse, HealthResponse};
pub use server::{AppState, HttpServer};
