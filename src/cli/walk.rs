//! Offline discovery: show what a page context references.
//!
//! No endpoint is contacted. Output is JSON:
//!
//! ```json
//! {
//!   "currentPath": "/sitecore/content/Home",
//!   "itemIds": ["{5ED52178-8F06-49BE-9D4C-F191E650189E}"],
//!   "symbolicPaths": ["Text 1"],
//!   "diagnostics": []
//! }
//! ```

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::context::{ContextSource, FileContextSource, PageContext, WalkResult, walk_context};
use crate::core::PublishStatusError;

/// Command to list the items a page context references.
#[derive(Debug, Args)]
pub struct WalkCommand {
    /// Page context JSON document, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    pub context: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WalkOutput<'a> {
    current_path: &'a str,
    item_ids: Vec<String>,
    symbolic_paths: &'a [String],
    diagnostics: &'a [String],
}

impl<'a> From<&'a WalkResult> for WalkOutput<'a> {
    fn from(result: &'a WalkResult) -> Self {
        Self {
            current_path: &result.current_path,
            item_ids: result.item_ids.iter().map(ToString::to_string).collect(),
            symbolic_paths: &result.symbolic_paths,
            diagnostics: &result.diagnostics,
        }
    }
}

impl WalkCommand {
    pub async fn execute(self) -> Result<()> {
        let document = FileContextSource::new(&self.context)
            .query_context()
            .await
            .map_err(|e| PublishStatusError::ContextUnavailable {
                reason: e.to_string(),
            })
            .with_context(|| {
                format!("Failed to read page context from {}", self.context.display())
            })?;

        let result = walk_context(&PageContext::new(document));
        if result.is_empty() {
            return Err(PublishStatusError::MissingAnchor.into());
        }

        println!("{}", serde_json::to_string_pretty(&WalkOutput::from(&result))?);
        Ok(())
    }
}
