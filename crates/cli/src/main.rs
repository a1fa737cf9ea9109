//! Vectordeck CLI
//!
//! Management console for an OpenAI-compatible files + vector-stores
//! backend: list and upload files, inspect vector stores and their
//! membership, and watch backend health.

mod commands;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use commands::{FilesCommand, StatusCommand, StoresCommand};
use vectordeck_core::{config::AppConfig, logging, AppResult};
use vectordeck_gateway::create_gateway;

/// Vectordeck - manage files and vector stores on a backend
#[derive(Parser, Debug)]
#[command(name = "vectordeck")]
#[command(about = "Manage files and vector stores on a backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend gateway base URL
    #[arg(short, long, global = true, env = "VECTORDECK_BASE_URL")]
    base_url: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true, env = "VECTORDECK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Uploaded file management
    Files(FilesCommand),

    /// Vector store inspection and membership
    Stores(StoresCommand),

    /// Backend connectivity
    Status(StatusCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let config = config.with_overrides(
        cli.base_url,
        cli.config,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;
    config.validate()?;

    tracing::debug!("Backend: {}", config.base_url);

    let gateway = create_gateway(
        "http",
        &config.base_url,
        Some(Duration::from_secs(config.request_timeout_secs)),
    )?;

    let command_name = match &cli.command {
        Commands::Files(_) => "files",
        Commands::Stores(_) => "stores",
        Commands::Status(_) => "status",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Files(cmd) => cmd.execute(&config, gateway).await,
        Commands::Stores(cmd) => cmd.execute(&config, gateway).await,
        Commands::Status(cmd) => cmd.execute(&config, gateway).await,
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {}", e);
    }

    result
}
