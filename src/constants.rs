//! Global constants used throughout the publish-status codebase.
//!
//! This module contains timeout durations, retry parameters, query defaults
//! and reserved values that are used across multiple modules. Defining them
//! centrally keeps the magic strings of the content APIs in one place.

use std::time::Duration;

/// Database queried on the authoring endpoint when none is configured.
pub const DEFAULT_DATABASE: &str = "master";

/// Language queried on the authoring endpoint when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default delivery endpoint for the live (published) data source.
pub const DEFAULT_LIVE_ENDPOINT: &str = "https://edge.sitecorecloud.io/api/graphql/v1";

/// Placeholder authoring GraphQL endpoint until one is configured.
pub const DEFAULT_AUTHORING_ENDPOINT: &str = "https://localhost/sitecore/api/authoring/graphql/v1";

/// Query parameter carrying the context token on authoring requests.
pub const CONTEXT_ID_PARAM: &str = "sitecoreContextId";

/// Header carrying the delivery API key on the live endpoint.
pub const LIVE_API_KEY_HEADER: &str = "sc_apikey";

/// Reserved identifier of the sentinel item produced for an empty report.
///
/// Canonical identifiers are always uppercase, so this lowercase value can
/// never collide with a real item.
pub const UNKNOWN_ITEM_ID: &str = "unknown";

/// Name used for an item neither endpoint returned a name for.
pub const UNKNOWN_ITEM_NAME: &str = "Unknown";

/// Prefix of datasource values relative to the current page.
pub const LOCAL_PATH_PREFIX: &str = "local:/";

/// Prefix of absolute content paths.
pub const CONTENT_PATH_PREFIX: &str = "/sitecore/";

/// Prefix of dynamic query datasources, which are not resolved.
pub const QUERY_PREFIX: &str = "query:";

/// Container folder that holds page-local datasource items.
pub const DATA_FOLDER: &str = "Data";

/// Alias prefix for bulk item queries (`item0`, `item1`, ...).
pub const ITEM_ALIAS_PREFIX: &str = "item";

/// Alias prefix for path resolution queries (`path0`, `path1`, ...).
pub const PATH_ALIAS_PREFIX: &str = "path";

/// Default HTTP request timeout for both endpoints.
pub fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Maximum backoff delay for exponential backoff (500ms).
///
/// Exponential backoff delays are capped at this value to prevent
/// excessive wait times while initialising the live client.
pub const MAX_BACKOFF_DELAY_MS: u64 = 500;

/// Starting delay for exponential backoff (10ms).
///
/// This is the initial delay used in exponential backoff calculations,
/// which doubles on each retry attempt.
pub const STARTING_BACKOFF_DELAY_MS: u64 = 10;

/// Number of attempts made to initialise the live client before giving up.
pub const DEFAULT_RETRY_ATTEMPTS: usize = 5;
