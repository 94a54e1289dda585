//! Datasource expression parsing.
//!
//! A rendering's datasource field holds a pipe-delimited list of references.
//! Each segment is one of:
//!
//! - a GUID literal in any bracing/hyphenation → direct identifier
//! - `local:/...` → path relative to the current page (symbolic)
//! - `/sitecore/...` → absolute content path (symbolic)
//! - `query:...` → dynamic query, not resolved and dropped
//!
//! Anything else is dropped as well. Dropping is never an error: the segment
//! is recorded in [`ParsedDatasource::skipped`] and logged.
//!
//! ```rust
//! use publish_status::datasource::parse_datasource;
//!
//! let parsed = parse_datasource("{AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE}|local:/Data/Text 1");
//! assert_eq!(parsed.direct_ids[0].as_str(), "AAAAAAAABBBBCCCCDDDDEEEEEEEEEEEE");
//! assert_eq!(parsed.symbolic_paths, vec!["Text 1".to_string()]);
//! ```

use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::{CONTENT_PATH_PREFIX, DATA_FOLDER, LOCAL_PATH_PREFIX, QUERY_PREFIX};
use crate::item_id::{ItemId, is_guid_like};

/// Why a datasource segment was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `query:` expressions are not evaluated.
    DynamicQuery,
    /// The segment matched no known reference format.
    Unrecognized,
}

/// A segment that was dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSegment {
    pub segment: String,
    pub reason: SkipReason,
}

impl SkippedSegment {
    /// One-line description for report diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.reason {
            SkipReason::DynamicQuery => {
                format!("Skipped unsupported query datasource: {}", self.segment)
            }
            SkipReason::Unrecognized => {
                format!("Skipped unrecognized datasource format: {}", self.segment)
            }
        }
    }
}

/// Result of parsing one datasource field value.
///
/// Both lists are deduplicated and keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDatasource {
    pub direct_ids: Vec<ItemId>,
    pub symbolic_paths: Vec<String>,
    pub skipped: Vec<SkippedSegment>,
}

impl ParsedDatasource {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.direct_ids.is_empty() && self.symbolic_paths.is_empty()
    }

    fn push_id(&mut self, id: ItemId) {
        if !self.direct_ids.contains(&id) {
            self.direct_ids.push(id);
        }
    }

    fn push_path(&mut self, path: String) {
        if !path.is_empty() && !self.symbolic_paths.contains(&path) {
            self.symbolic_paths.push(path);
        }
    }
}

/// Parse a raw datasource value taken from an untyped document.
///
/// Non-string values are treated as "no datasources".
#[must_use]
pub fn parse_datasource_value(value: &Value) -> ParsedDatasource {
    match value.as_str() {
        Some(raw) => parse_datasource(raw),
        None => ParsedDatasource::default(),
    }
}

/// Parse a pipe-delimited datasource expression.
///
/// Segments are trimmed and empty segments ignored. Precedence per segment:
/// GUID, `local:/`, `/sitecore/`, `query:`, anything else.
#[must_use]
pub fn parse_datasource(raw: &str) -> ParsedDatasource {
    let mut parsed = ParsedDatasource::default();

    for segment in raw.split('|').map(str::trim).filter(|s| !s.is_empty()) {
        if is_guid_like(segment) {
            parsed.push_id(ItemId::parse(segment));
        } else if let Some(rest) = segment.strip_prefix(LOCAL_PATH_PREFIX) {
            parsed.push_path(local_item_name(rest).to_string());
        } else if segment.starts_with(CONTENT_PATH_PREFIX) {
            parsed.push_path(segment.to_string());
        } else if segment.starts_with(QUERY_PREFIX) {
            warn!("Query datasources are not supported, skipping: {}", segment);
            parsed.skipped.push(SkippedSegment {
                segment: segment.to_string(),
                reason: SkipReason::DynamicQuery,
            });
        } else {
            debug!("Unrecognized datasource format, skipping: {}", segment);
            parsed.skipped.push(SkippedSegment {
                segment: segment.to_string(),
                reason: SkipReason::Unrecognized,
            });
        }
    }

    parsed
}

/// Strip a leading `Data/` container from a page-relative path.
pub(crate) fn local_item_name(relative: &str) -> &str {
    let relative = relative.trim_start_matches('/');
    relative
        .strip_prefix(DATA_FOLDER)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_guid_and_local_path() {
        let parsed =
            parse_datasource("{AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE}|local:/Data/Text 1");
        assert_eq!(parsed.direct_ids, vec![ItemId::parse("AAAAAAAABBBBCCCCDDDDEEEEEEEEEEEE")]);
        assert_eq!(parsed.direct_ids[0].as_str(), "AAAAAAAABBBBCCCCDDDDEEEEEEEEEEEE");
        assert_eq!(parsed.symbolic_paths, vec!["Text 1"]);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_local_path_without_data_folder() {
        let parsed = parse_datasource("local:/Promo");
        assert_eq!(parsed.symbolic_paths, vec!["Promo"]);
    }

    #[test]
    fn test_absolute_content_path_kept_whole() {
        let parsed = parse_datasource("/sitecore/content/Site/Home/Data/Hero");
        assert_eq!(parsed.symbolic_paths, vec!["/sitecore/content/Site/Home/Data/Hero"]);
        assert!(parsed.direct_ids.is_empty());
    }

    #[test]
    fn test_query_and_unknown_segments_are_skipped() {
        let parsed = parse_datasource("query:./*[@@templatename='Card']|whatever");
        assert!(parsed.is_empty());
        assert_eq!(parsed.skipped.len(), 2);
        assert_eq!(parsed.skipped[0].reason, SkipReason::DynamicQuery);
        assert_eq!(parsed.skipped[1].reason, SkipReason::Unrecognized);
    }

    #[test]
    fn test_empty_segments_and_whitespace() {
        let parsed = parse_datasource(" | {aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee} || ");
        assert_eq!(parsed.direct_ids.len(), 1);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_duplicates_collapse_across_formats() {
        let parsed = parse_datasource(
            "{AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE}|aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee",
        );
        assert_eq!(parsed.direct_ids.len(), 1);
    }

    #[test]
    fn test_unhyphenated_guid_is_not_an_identifier() {
        let parsed = parse_datasource("AAAAAAAABBBBCCCCDDDDEEEEEEEEEEEE");
        assert!(parsed.direct_ids.is_empty());
        assert_eq!(
            parsed.skipped,
            vec![SkippedSegment {
                segment: "AAAAAAAABBBBCCCCDDDDEEEEEEEEEEEE".to_string(),
                reason: SkipReason::Unrecognized,
            }]
        );
    }

    #[test]
    fn test_non_string_value_yields_nothing() {
        assert!(parse_datasource_value(&json!(42)).is_empty());
        assert!(parse_datasource_value(&Value::Null).is_empty());
        assert!(parse_datasource_value(&json!("")).is_empty());
    }
}
