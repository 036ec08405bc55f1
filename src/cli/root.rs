use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use super::run::RunCommand;
use crate::config::Config;
use crate::tui;

/// focus-modal - an accessible modal dialog for the terminal
#[derive(Parser)]
#[command(
    name = "focus-modal",
    version,
    about = "An accessible modal dialog with a keyboard focus trap",
    long_about = r#"Shows a page with a button that opens a modal dialog. While the dialog is
open, Tab and Shift+Tab stay inside it, Escape closes it and focus returns to
the button that opened it.

Examples:
  focus-modal                                  # Start interactive mode
  focus-modal run --keys tab,tab,enter,esc     # Replay keys headlessly
  focus-modal --config ./focus-modal.json      # Use a specific config file"#
)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Write logs to this file
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a key sequence against the demo page and print each step
    Run(RunCommand),
}

impl Cli {
    /// True when the terminal UI will own the screen
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        let config = Config::init(self.config.as_deref()).await?;
        debug!("Configuration initialized");

        match self.command {
            Some(Commands::Run(run_cmd)) => run_cmd.execute(&config).await,
            None => {
                info!("Starting interactive mode");
                tui::run(&config).await?;
                info!("Application finished");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_interactive() {
        let cli = Cli::parse_from(["focus-modal", "--debug"]);
        assert!(cli.is_interactive());
        assert!(cli.debug);
    }

    #[test]
    fn test_run_subcommand_with_global_flags() {
        let cli = Cli::parse_from([
            "focus-modal",
            "run",
            "--keys",
            "tab,enter",
            "--log-file",
            "modal.log",
        ]);
        assert!(!cli.is_interactive());
        assert_eq!(cli.log_file, Some(PathBuf::from("modal.log")));
    }
}
