//! Run a fetch cycle and report publish status.
//!
//! ```bash
//! pubstatus check --context page.json
//! pubstatus check --context - --context-id ctx-1234 --format json
//! pubstatus check --context page.json --check   # exit 1 unless everything is live
//! ```
//!
//! The context token used for path resolution and authoring queries comes
//! from `--context-id`, falling back to `authoring.context_id` in the
//! configuration file. Without one, page-relative datasources are reported
//! but not resolved.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::Config;
use crate::context::FileContextSource;
use crate::cycle::FetchCycle;
use crate::report::Report;

/// Command to check the publish status of a page.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Page context JSON document, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    pub context: PathBuf,

    /// Context token for the authoring endpoint (overrides the config file)
    #[arg(long, value_name = "ID")]
    pub context_id: Option<String>,

    /// Output format (table or json)
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Exit with non-zero code if any item is unpublished or outdated
    #[arg(long)]
    pub check: bool,
}

impl CheckCommand {
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let config = Config::load_with_optional(config_path).await?;
        let cycle = FetchCycle::from_config(&config).context("Failed to create HTTP client")?;
        let source = FileContextSource::new(&self.context);
        let token = self.context_id.clone().or_else(|| config.authoring.context_id.clone());

        let result = cycle.run(&source, token.as_deref()).await;
        cycle.shutdown().await;
        let report = result?;

        self.display(&report)?;

        if self.check && !report.summary().is_clean() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn display(&self, report: &Report) -> Result<()> {
        match self.format.as_str() {
            "json" => println!("{}", serde_json::to_string_pretty(report)?),
            _ => print!("{}", report.render_table()),
        }
        Ok(())
    }
}
