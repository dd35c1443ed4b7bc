//! Command implementations for the relquery CLI

pub mod catalog;
pub mod query;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};
use relquery_server::GatewayConfig;

pub use catalog::run_catalog;
pub use query::run_query;
pub use serve::run_serve;

/// Load the gateway config: `--config`, then `RELQUERY_CONFIG`, then
/// `~/.relquery/config.toml`, then built-in defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<GatewayConfig> {
    GatewayConfig::discover(path).context("Failed to load configuration")
}
