//! relquery-server: relational query gateway
//!
//! Resolves typed query descriptors against a static relationship graph,
//! executes them through sqlx and exposes the storefront queries over HTTP.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod query;

pub use catalog::{Catalog, CatalogError};
pub use config::{ConfigError, GatewayConfig, QueryDefaults};
pub use error::{GatewayError, Result};
pub use query::{QueryDescriptor, QueryExecutor, RawStatement, Record, Value};
