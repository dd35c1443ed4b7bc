//! HTTP server command
//!
//! Prepares the database (schema, optional demo rows) and runs the gateway.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use relquery_server::catalog::storefront;
use relquery_server::db::{create_pool_with_options, migrations, seed};
use relquery_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config; default: 127.0.0.1:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Config file (default: $RELQUERY_CONFIG or ~/.relquery/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Do not insert the demo dataset into an empty database
    #[arg(long)]
    pub no_seed: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if args.cors_permissive {
        config.server.cors_permissive = true;
    }
    if args.no_seed {
        config.database.seed = false;
    }

    tracing::info!("Starting relquery gateway on {}", config.server.bind);

    let pool = create_pool_with_options(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to apply schema")?;

    if config.database.seed && seed::run(&pool).await.context("Failed to seed database")? {
        tracing::info!("Inserted demo dataset");
    }

    let catalog = storefront::catalog().context("Failed to build catalog")?;

    // Run server (blocks until shutdown)
    run_server(pool, catalog, ServerConfig::from(&config))
        .await
        .context("Server error")?;

    Ok(())
}
