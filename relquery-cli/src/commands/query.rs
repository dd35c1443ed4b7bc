//! Run a query descriptor from the command line

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use relquery_server::catalog::storefront;
use relquery_server::db::{create_pool_with_options, migrations, seed};
use relquery_server::{QueryDescriptor, QueryExecutor};

/// Arguments for the query command
#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Descriptor JSON file, or `-` for stdin
    pub descriptor: PathBuf,

    /// Database URL (overrides config)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Config file (default: $RELQUERY_CONFIG or ~/.relquery/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Insert the demo dataset first if the database is empty
    #[arg(long)]
    pub seed: bool,
}

fn read_descriptor(path: &Path) -> Result<QueryDescriptor> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read descriptor from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&content).context("Invalid query descriptor")
}

/// Execute the descriptor and print the records as pretty JSON
pub async fn run_query(args: QueryArgs) -> Result<()> {
    let descriptor = read_descriptor(&args.descriptor)?;

    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    let pool = create_pool_with_options(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;
    migrations::run(&pool)
        .await
        .context("Failed to apply schema")?;
    if args.seed {
        seed::run(&pool).await.context("Failed to seed database")?;
    }

    let catalog = storefront::catalog().context("Failed to build catalog")?;
    let records = QueryExecutor::new(&pool, &catalog)
        .execute(&descriptor)
        .await
        .context("Query failed")?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
