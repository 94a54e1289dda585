//! Configuration for publish-status.
//!
//! Settings live in a single TOML file, `~/.pubstatus/config.toml` by
//! default. The location can be overridden with `--config` or the
//! `PUBSTATUS_CONFIG_PATH` environment variable.
//!
//! # Modules
//!
//! - `global` - the configuration file model, loading and saving

mod global;

pub use global::{AuthoringConfig, Config, LiveConfig, NetworkConfig};
