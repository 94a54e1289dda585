//! User configuration stored in `~/.pubstatus/config.toml`.
//!
//! The file holds endpoint URLs and credentials, so it is written with
//! owner-only permissions on Unix and never printed unmasked.
//!
//! ```toml
//! [authoring]
//! endpoint = "https://cm.example.com/sitecore/api/authoring/graphql/v1"
//! token = "eyJhbGciOi..."
//! database = "master"
//! language = "en"
//! context_id = "ctx-1234"
//!
//! [live]
//! endpoint = "https://edge.sitecorecloud.io/api/graphql/v1"
//! api_key = "..."
//!
//! [network]
//! timeout_secs = 30
//! retry_initial_delay_ms = 10
//! retry_max_delay_ms = 500
//! retry_attempts = 5
//! ```
//!
//! Every key is optional. A missing file is the same as an empty one.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::client::RetryPolicy;
use crate::constants::{
    DEFAULT_AUTHORING_ENDPOINT, DEFAULT_DATABASE, DEFAULT_LANGUAGE, DEFAULT_LIVE_ENDPOINT,
    DEFAULT_RETRY_ATTEMPTS, MAX_BACKOFF_DELAY_MS, STARTING_BACKOFF_DELAY_MS,
    default_request_timeout,
};
use crate::graphql::AuthoringScope;

/// Shown in place of secrets by `config show`.
const MASK: &str = "***";

const EXAMPLE_HEADER: &str = "\
# publish-status configuration
# This file contains credentials - do not commit it to version control
#
# [authoring] points at the authoring GraphQL endpoint (draft content).
# [live] points at the delivery endpoint serving published content.
";

fn default_authoring_endpoint() -> String {
    DEFAULT_AUTHORING_ENDPOINT.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_live_endpoint() -> String {
    DEFAULT_LIVE_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    default_request_timeout().as_secs()
}

const fn default_retry_initial_delay_ms() -> u64 {
    STARTING_BACKOFF_DELAY_MS
}

const fn default_retry_max_delay_ms() -> u64 {
    MAX_BACKOFF_DELAY_MS
}

const fn default_retry_attempts() -> usize {
    DEFAULT_RETRY_ATTEMPTS
}

/// Authoring endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoringConfig {
    #[serde(default = "default_authoring_endpoint")]
    pub endpoint: String,

    /// Bearer token for the authoring endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Context token sent as `sitecoreContextId`. Required for resolving
    /// page-relative datasource paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
}

impl Default for AuthoringConfig {
    fn default() -> Self {
        Self {
            endpoint: default_authoring_endpoint(),
            token: None,
            database: default_database(),
            language: default_language(),
            context_id: None,
        }
    }
}

/// Live delivery endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveConfig {
    #[serde(default = "default_live_endpoint")]
    pub endpoint: String,

    /// Delivery API key, sent as the `sc_apikey` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            endpoint: default_live_endpoint(),
            api_key: None,
        }
    }
}

/// Request timeout and live client retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,

    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

impl NetworkConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay_ms: self.retry_initial_delay_ms,
            max_delay_ms: self.retry_max_delay_ms,
            attempts: self.retry_attempts,
        }
    }
}

/// Complete user configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub authoring: AuthoringConfig,

    #[serde(default)]
    pub live: LiveConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

impl Config {
    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file yields the default configuration.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Write the configuration, preceded by an explanatory header.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let body = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, format!("{EXAMPLE_HEADER}\n{body}"))
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        // Credentials live in this file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(path)
                .await
                .with_context(|| format!("Failed to read permissions for {}", path.display()))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).await.with_context(|| {
                format!("Failed to set secure permissions on {}", path.display())
            })?;
        }

        Ok(())
    }

    /// `~/.pubstatus/config.toml` (`%LOCALAPPDATA%\pubstatus\config.toml` on Windows).
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("pubstatus")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".pubstatus")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Example written by `config init`.
    #[must_use]
    pub fn init_example() -> Self {
        Self {
            authoring: AuthoringConfig {
                endpoint: "https://cm.example.com/sitecore/api/authoring/graphql/v1".to_string(),
                token: Some("YOUR_AUTHORING_TOKEN".to_string()),
                context_id: Some("YOUR_CONTEXT_ID".to_string()),
                ..AuthoringConfig::default()
            },
            live: LiveConfig {
                api_key: Some("YOUR_DELIVERY_API_KEY".to_string()),
                ..LiveConfig::default()
            },
            network: NetworkConfig::default(),
        }
    }

    /// Copy with every secret replaced by a mask.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if masked.authoring.token.is_some() {
            masked.authoring.token = Some(MASK.to_string());
        }
        if masked.live.api_key.is_some() {
            masked.live.api_key = Some(MASK.to_string());
        }
        masked
    }

    #[must_use]
    pub fn authoring_scope(&self) -> AuthoringScope {
        AuthoringScope {
            database: self.authoring.database.clone(),
            language: self.authoring.language.clone(),
        }
    }
}
