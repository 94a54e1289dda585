//! Manage the configuration file.
//!
//! ```bash
//! pubstatus config init            # write an example file
//! pubstatus config show            # print effective settings, secrets masked
//! pubstatus config path            # print the file location
//! ```

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::Config;

/// Command to manage configuration settings.
#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Debug, Subcommand)]
enum ConfigSubcommands {
    /// Write an example configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration (default)
    Show,

    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let path = match config_path {
            Some(path) => path,
            None => Config::default_path()?,
        };

        match self.command {
            Some(ConfigSubcommands::Init {
                force,
            }) => Self::init(&path, force).await,
            Some(ConfigSubcommands::Show) | None => Self::show(&path).await,
            Some(ConfigSubcommands::Path) => {
                println!("{}", path.display());
                Ok(())
            }
        }
    }

    async fn init(path: &std::path::Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            println!("{} Config already exists at: {}", "✗".red(), path.display());
            println!("   Use --force to overwrite");
            return Ok(());
        }

        Config::init_example().save_to(path).await?;

        println!("{} Created config at: {}", "✓".green(), path.display());
        println!("\n{}", "Next steps:".bold());
        println!("  1. Set the authoring endpoint and token");
        println!("  2. Set the live delivery API key");
        println!("  3. Run 'pubstatus check --context <FILE>'");
        Ok(())
    }

    async fn show(path: &std::path::Path) -> Result<()> {
        let config = Config::load_with_optional(Some(path.to_path_buf())).await?;
        let rendered =
            toml::to_string_pretty(&config.masked()).context("Failed to serialize config")?;

        if path.exists() {
            println!("{} {}\n", "Config file:".bold(), path.display());
        } else {
            println!(
                "{} {} (not found, showing defaults)\n",
                "Config file:".bold(),
                path.display()
            );
        }
        println!("{rendered}");
        Ok(())
    }
}
