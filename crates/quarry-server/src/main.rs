//! Quarry Server CLI
//!
//! Starts the HTTP server for query extraction and RAG answering.

use clap::Parser;
use quarry_server::{config::ServerConfig, start_server, ServerError};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Quarry - natural language to sales queries, and context-grounded answers
#[derive(Debug, Parser)]
#[command(name = "quarry-server", version, about)]
struct Cli {
    /// Load configuration from a TOML file
    #[arg(long, env = "QUARRY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind port
    #[arg(long)]
    bind_port: Option<u16>,

    /// Override the model name
    #[arg(long, env = "QUARRY_MODEL")]
    model: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => {
            tracing::warn!("No config file specified, using defaults");
            ServerConfig::default()
        }
    };

    if let Some(port) = cli.bind_port {
        config.bind_port = port;
    }
    if let Some(model) = cli.model {
        config.model.name = model;
    }

    start_server(config).await
}
