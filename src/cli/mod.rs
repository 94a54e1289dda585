//! Command-line interface for publish-status.
//!
//! # Available Commands
//!
//! - `check` - Run a full fetch cycle and report publish status
//! - `walk` - List the items a page context references, offline
//! - `config` - Manage the configuration file
//!
//! # Global Options
//!
//! All commands support these global options:
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only log errors
//! - `--config` - Path to a custom config file (also `PUBSTATUS_CONFIG_PATH`)
//!
//! Logs are written to stderr, so `--format json` output on stdout can be
//! piped safely.
//!
//! # Example
//!
//! ```bash
//! # Check the page described by a context document
//! pubstatus check --context page.json
//!
//! # Fail a CI step when anything is unpublished or outdated
//! pubstatus check --context page.json --format json --check
//!
//! # Read the context from stdin
//! cat page.json | pubstatus walk --context -
//! ```

mod check;
mod config;
mod walk;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use check::CheckCommand;
pub use config::ConfigCommand;
pub use walk::WalkCommand;

/// Runtime configuration derived from the global options.
///
/// Kept separate from [`Cli`] so tests and embedders can run commands
/// without touching process-wide state beyond logging.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level filter. `RUST_LOG` takes precedence when set.
    pub log_level: Option<String>,

    /// Custom path to the configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Install the stderr log subscriber. Later calls are no-ops.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("info"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "pubstatus",
    about = "Compare authoring and live versions of the items on a page",
    version,
    author,
    long_about = "pubstatus discovers every content item a page uses, queries the authoring \
                  and live GraphQL endpoints for each, and reports which items are published, \
                  outdated or unpublished."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "PUBSTATUS_CONFIG_PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report publish status for the items on a page
    Check(CheckCommand),

    /// List the items and datasource paths a page context references
    Walk(WalkCommand),

    /// Manage the configuration file
    Config(ConfigCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Check(cmd) => cmd.execute(config.config_path).await,
            Commands::Walk(cmd) => cmd.execute().await,
            Commands::Config(cmd) => cmd.execute(config.config_path).await,
        }
    }
}
