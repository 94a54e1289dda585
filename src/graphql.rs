//! GraphQL query construction and response envelopes.
//!
//! Both endpoints are queried with one document per request in which every
//! requested item is aliased by its ordinal position: `item0`, `item1`, ...
//! for bulk item queries and `path0`, `path1`, ... for path resolution. The
//! alias is the only join key between a request and its response; the
//! identifier fields inside the payloads are never used for matching.
//!
//! Query text is built by interpolation. Every interpolated value passes
//! through [`escape_string`], so a path containing a quote cannot break out
//! of its string literal.
//!
//! # Query shapes
//!
//! Authoring (explicit database and language):
//!
//! ```text
//! query {
//!   item0: item(where: {
//!     database: "master", itemId: "5ED52178-8F06-49BE-9D4C-F191E650189E", language: "en"
//!   }) {
//!     itemId name path version template { name } language { name }
//!     fields(ownFields: true, excludeStandardFields: true) { nodes { name value } }
//!   }
//! }
//! ```
//!
//! Live (scoped by path, braced GUID):
//!
//! ```text
//! query {
//!   item0: item(path: "{5ED52178-8F06-49BE-9D4C-F191E650189E}") {
//!     id name version language { name }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write as _;

use crate::constants::{ITEM_ALIAS_PREFIX, PATH_ALIAS_PREFIX};
use crate::core::TransportError;
use crate::item_id::ItemId;

/// Which data source a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Editable draft content (master database).
    Authoring,
    /// Published delivery content.
    Live,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Authoring => "authoring",
            Self::Live => "live",
        })
    }
}

/// One GraphQL request for a transport to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQlRequest {
    pub source: DataSource,
    pub query: String,
    pub context_token: Option<String>,
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

/// A decoded GraphQL response body: `{ data, errors }`.
///
/// `data` maps aliases to payloads (or `null` for an empty slot).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

impl GraphQlResponse {
    /// A well-formed response with no items.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            data: Some(Map::new()),
            errors: None,
        }
    }
}

/// Outcome of one query as seen by the reconciler.
///
/// `Response(None)` means the transport completed but produced no top-level
/// response. `Failed` carries a transport error that was caught and converted;
/// it never propagates further.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEnvelope {
    Response(Option<GraphQlResponse>),
    Failed { error: String },
}

impl QueryEnvelope {
    /// Envelope for an empty identifier list; no call is issued for it.
    #[must_use]
    pub fn empty() -> Self {
        Self::Response(Some(GraphQlResponse::empty()))
    }

    /// Convert a transport outcome; errors become [`QueryEnvelope::Failed`].
    #[must_use]
    pub fn from_result(result: Result<Option<GraphQlResponse>, TransportError>) -> Self {
        match result {
            Ok(response) => Self::Response(response),
            Err(e) => Self::Failed {
                error: e.to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Settings interpolated into authoring queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoringScope {
    pub database: String,
    pub language: String,
}

/// Alias of the item at `index` in a bulk query.
#[must_use]
pub fn item_alias(index: usize) -> String {
    format!("{ITEM_ALIAS_PREFIX}{index}")
}

/// Alias of the path at `index` in a resolution query.
#[must_use]
pub fn path_alias(index: usize) -> String {
    format!("{PATH_ALIAS_PREFIX}{index}")
}

/// Escape a value for use inside a double-quoted GraphQL string.
#[must_use]
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Bulk item query against the authoring endpoint.
#[must_use]
pub fn authoring_items_query(ids: &[ItemId], scope: &AuthoringScope) -> String {
    let mut query = String::from("query {\n");
    for (i, id) in ids.iter().enumerate() {
        let _ = writeln!(
            query,
            "  {}: item(where: {{ database: \"{}\", itemId: \"{}\", language: \"{}\" }}) {{\n    \
             itemId\n    name\n    path\n    version\n    \
             template {{ name }}\n    language {{ name }}\n    \
             fields(ownFields: true, excludeStandardFields: true) \
             {{ nodes {{ name value }} }}\n  }}",
            item_alias(i),
            escape_string(&scope.database),
            escape_string(&id.hyphenated()),
            escape_string(&scope.language),
        );
    }
    query.push('}');
    query
}

/// Bulk item query against the live endpoint.
#[must_use]
pub fn live_items_query(ids: &[ItemId]) -> String {
    let mut query = String::from("query {\n");
    for (i, id) in ids.iter().enumerate() {
        let _ = writeln!(
            query,
            "  {}: item(path: \"{}\") {{\n    \
             id\n    name\n    version\n    language {{ name }}\n  }}",
            item_alias(i),
            escape_string(&id.braced()),
        );
    }
    query.push('}');
    query
}

/// Identifier lookup for absolute content paths, against the authoring endpoint.
#[must_use]
pub fn resolve_paths_query(paths: &[String], scope: &AuthoringScope) -> String {
    let mut query = String::from("query {\n");
    for (i, path) in paths.iter().enumerate() {
        let _ = writeln!(
            query,
            "  {}: item(where: {{ database: \"{}\", path: \"{}\", language: \"{}\" }}) \
             {{\n    itemId\n  }}",
            path_alias(i),
            escape_string(&scope.database),
            escape_string(path),
            escape_string(&scope.language),
        );
    }
    query.push('}');
    query
}
