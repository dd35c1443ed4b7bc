//! relquery CLI - relational query gateway
//!
//! - `serve`: run the HTTP gateway
//! - `query`: execute a JSON query descriptor and print the records
//! - `catalog`: show the entities and relationships queries can use
//! - `completions`: shell completion scripts

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "relquery",
    author,
    version,
    about = "Relational query gateway over a typed relationship catalog"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP
    #[cfg(feature = "telemetry")]
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP gateway
    Serve(commands::serve::ServeArgs),
    /// Execute a query descriptor and print the records as JSON
    Query(commands::query::QueryArgs),
    /// Print the entity catalog and its relationships
    Catalog(commands::catalog::CatalogArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: clap_complete::Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so clap `env` fallbacks can see it
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        #[cfg(feature = "telemetry")]
        otel: cli.otel,
        ..Default::default()
    })
    .ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Query(args) => commands::run_query(args).await,
        Commands::Catalog(args) => commands::run_catalog(args),
        Commands::Completions(args) => run_completions(args),
    };

    tracing_setup::shutdown_otel();
    result
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
