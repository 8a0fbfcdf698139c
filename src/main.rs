//! kubedeck - backend service for a Kubernetes web dashboard
//!
//! Serves resource listings, status projections, manifests and label search
//! over JSON, with a context-keyed client cache in front of the cluster API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kubedeck::cli::{ConfigSubcommand, handle_config_command, init_logging};
use kubedeck::config::ConfigLoader;
use kubedeck::server;

/// kubedeck - backend service for a Kubernetes web dashboard
#[derive(Parser, Debug)]
#[command(name = "kubedeck")]
#[command(about = "Backend service for a Kubernetes web dashboard", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Listen address (overrides configuration)
    #[arg(long)]
    bind: Option<String>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand; omitting it starts the server
    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (the default)
    Serve,
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match args.command {
        Some(Command::Config { subcommand }) => handle_config_command(subcommand),
        Some(Command::Serve) | None => {
            let mut config = ConfigLoader::load(args.config.as_deref())
                .context("Failed to load configuration")?;
            if let Some(bind) = args.bind {
                config.bind = bind;
            }
            server::serve(config).await
        }
    }
}
