//! Item identifier normalization.
//!
//! Content items are identified by GUIDs that travel in three textual forms:
//!
//! | Form                | Example                                  | Used for            |
//! |---------------------|------------------------------------------|---------------------|
//! | braced-hyphenated   | `{5ED52178-8F06-49BE-9D4C-F191E650189E}` | display, live query |
//! | hyphenated          | `5ED52178-8F06-49BE-9D4C-F191E650189E`   | authoring query     |
//! | canonical (compact) | `5ED521788F0649BE9D4CF191E650189E`       | comparison, dedup   |
//!
//! Every identity comparison and every set operation in this crate happens on
//! the canonical form, which is what [`ItemId`] stores.
//!
//! # Examples
//!
//! ```rust
//! use publish_status::item_id::{ItemId, to_canonical, to_hyphenated};
//!
//! let id = ItemId::parse("{5ed52178-8f06-49be-9d4c-f191e650189e}");
//! assert_eq!(id.as_str(), "5ED521788F0649BE9D4CF191E650189E");
//! assert_eq!(id.hyphenated(), "5ED52178-8F06-49BE-9D4C-F191E650189E");
//!
//! // Malformed input passes through without failing
//! assert_eq!(to_canonical("not-a-guid"), "NOTAGUID");
//! assert_eq!(to_hyphenated("not-a-guid"), "not-a-guid");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::constants::UNKNOWN_ITEM_ID;

static GUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\{?[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\}?$",
    )
    .unwrap_or_else(|e| panic!("invalid GUID pattern: {e}"))
});

/// Length of a canonical identifier.
const CANONICAL_LEN: usize = 32;

/// Hyphen offsets in the 8-4-4-4-12 layout.
const HYPHEN_OFFSETS: [usize; 4] = [8, 12, 16, 20];

/// Strip braces and hyphens and uppercase.
///
/// Never fails: input that is not a GUID simply passes through stripped and
/// uppercased. Callers that need strictness must check [`is_guid_like`].
#[must_use]
pub fn to_canonical(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '-'))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Canonicalize then insert hyphens at offsets 8/12/16/20.
///
/// Returns the original input unchanged when the canonical form is not
/// exactly 32 characters long.
#[must_use]
pub fn to_hyphenated(raw: &str) -> String {
    let canonical = to_canonical(raw);
    if canonical.len() != CANONICAL_LEN || !canonical.is_ascii() {
        return raw.to_string();
    }

    let mut out = String::with_capacity(CANONICAL_LEN + HYPHEN_OFFSETS.len());
    for (i, c) in canonical.chars().enumerate() {
        if HYPHEN_OFFSETS.contains(&i) {
            out.push('-');
        }
        out.push(c);
    }
    out
}

/// Hyphenated form wrapped in braces, as the live endpoint expects.
///
/// Like [`to_hyphenated`], malformed input is returned unchanged.
#[must_use]
pub fn to_braced(raw: &str) -> String {
    let hyphenated = to_hyphenated(raw);
    if hyphenated.len() == CANONICAL_LEN + HYPHEN_OFFSETS.len() {
        format!("{{{hyphenated}}}")
    } else {
        hyphenated
    }
}

/// Whether `raw` matches the standard 8-4-4-4-12 hex pattern, braces optional.
#[must_use]
pub fn is_guid_like(raw: &str) -> bool {
    GUID_PATTERN.is_match(raw.trim())
}

/// A content item identifier in canonical form.
///
/// Equality and hashing use the canonical string, so two `ItemId`s parsed
/// from differently formatted inputs of the same GUID compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Canonicalize any textual form into an `ItemId`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(to_canonical(raw))
    }

    /// The reserved identifier of the empty-report sentinel.
    #[must_use]
    pub fn unknown() -> Self {
        Self(UNKNOWN_ITEM_ID.to_string())
    }

    /// Whether this is the reserved sentinel identifier.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_ITEM_ID
    }

    /// Canonical form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hyphenated form, used by the authoring endpoint.
    #[must_use]
    pub fn hyphenated(&self) -> String {
        to_hyphenated(&self.0)
    }

    /// Braced-hyphenated form, used for display and the live endpoint.
    #[must_use]
    pub fn braced(&self) -> String {
        to_braced(&self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.braced())
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
