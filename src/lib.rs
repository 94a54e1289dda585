//! publish-status - authoring vs. live publish status for content items
//!
//! Given the page context document of the page open in an editor, this crate
//! finds every content item the page uses, looks each one up in the authoring
//! (draft) and live (published) GraphQL endpoints, and reports per item
//! whether it is published, outdated or unpublished.
//!
//! # Architecture Overview
//!
//! One fetch cycle runs these stages, leaves first:
//!
//! - [`item_id`] - identifier normalization between braced, hyphenated and
//!   canonical GUID forms
//! - [`datasource`] - parsing of pipe-delimited datasource expressions
//! - [`context`] - defensive walk of the page context document
//! - [`resolver`] - resolution of symbolic datasource paths into identifiers
//! - [`fetcher`] - concurrent authoring and live queries
//! - [`reconcile`] - ordinal merge of both result sets into item records
//! - [`report`] - current item, referenced items and summary
//! - [`cycle`] - orchestration of one cycle
//!
//! ## Supporting Modules
//!
//! - [`graphql`] - query text construction and response envelopes
//! - [`client`] - HTTP transport and the live client handle
//! - [`config`] - `~/.pubstatus/config.toml`
//! - [`core`] - errors and diagnostics
//! - [`cli`] - the `pubstatus` command line
//!
//! # Example
//!
//! ```rust,no_run
//! use publish_status::config::Config;
//! use publish_status::context::FileContextSource;
//! use publish_status::cycle::FetchCycle;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load_with_optional(None).await?;
//! let cycle = FetchCycle::from_config(&config)?;
//!
//! let report = cycle.run(&FileContextSource::new("page.json"), Some("ctx-1234")).await?;
//! let summary = report.summary();
//! println!("{} of {} item(s) published", summary.published, summary.total);
//!
//! cycle.shutdown().await;
//! # Ok(())
//! # }
//! ```

// Pipeline stages
pub mod context;
pub mod cycle;
pub mod datasource;
pub mod fetcher;
pub mod item_id;
pub mod reconcile;
pub mod report;
pub mod resolver;

// Endpoints
pub mod client;
pub mod graphql;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
