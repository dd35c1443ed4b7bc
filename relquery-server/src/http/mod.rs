//! HTTP server layer
//!
//! Axum server with:
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod prepared;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use prepared::PreparedPlans;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
