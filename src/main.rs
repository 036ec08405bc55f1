use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod tui;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Set up panic hook for graceful error recovery
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {}", panic_info);
        std::process::exit(1);
    }));

    // Load environment variables from .env file
    let dotenv_result = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.debug, cli.log_file.as_deref(), cli.is_interactive()) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = dotenv_result {
        // Don't error if .env file doesn't exist, just log it
        tracing::debug!("No .env file found or error loading it: {}", e);
    }

    if let Err(e) = cli.execute().await {
        error!("Application error: {}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr for headless runs. While the TUI owns the terminal they
/// go to the log file, or are dropped when none was given.
fn init_logging(debug: bool, log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let default_filter = if debug { "focus_modal=debug" } else { "focus_modal=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .try_init()
        }
        None if interactive => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
            .try_init(),
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}
