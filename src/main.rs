//! pubstatus CLI entry point
//!
//! Parses arguments, runs the selected command and renders failures as
//! user-friendly errors with suggestions.
//!
//! - `check` - report publish status for the items on a page
//! - `walk` - list the items a page context references
//! - `config` - manage the configuration file

use anyhow::Result;
use clap::Parser;
use publish_status::cli;
use publish_status::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
