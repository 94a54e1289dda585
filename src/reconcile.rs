//! Merging authoring and live results into per-item publish status.
//!
//! Results are joined by ordinal position only. The identifier list handed
//! to the fetcher is the single source of truth: `item{i}` in either
//! response belongs to `ids[i]`, whatever identifier field the payload
//! itself carries. The two endpoints name and format that field differently
//! (`itemId` hyphenated vs. `id` compact), so payload identifiers are never
//! read.
//!
//! Envelope validation and data extraction are independent. A response with
//! a populated `errors` array is reported as invalid, but whatever `data` it
//! carries is still used.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::constants::UNKNOWN_ITEM_NAME;
use crate::core::Diagnostics;
use crate::graphql::{QueryEnvelope, item_alias};
use crate::item_id::ItemId;

/// Relationship of an item to the current page.
///
/// Only [`ItemKind::Current`] and [`ItemKind::Reference`] are produced.
/// `Datasource` and `Link` are reserved for a finer classification of
/// references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Current,
    Datasource,
    Link,
    Reference,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Current => "current",
            Self::Datasource => "datasource",
            Self::Link => "link",
            Self::Reference => "reference",
        })
    }
}

/// Publish status of one content item.
///
/// Built once per fetch cycle by [`reconcile`] and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedItem {
    pub id: ItemId,
    pub name: String,
    pub path: String,
    /// Authoring version, `0` when authoring returned nothing.
    pub latest_version: u64,
    /// Live version, `None` when the item is not published.
    pub published_version: Option<u64>,
    pub is_published: bool,
    pub is_outdated: bool,
    /// `latest - published` when published, otherwise `latest`.
    pub version_difference: i64,
    pub item_type: ItemKind,
    pub template: Option<String>,
    pub language: Option<String>,
}

impl ProcessedItem {
    /// Build a record from the payloads found at one ordinal.
    ///
    /// Either payload may be missing; the other is still used.
    #[must_use]
    pub fn from_payloads(
        id: ItemId,
        item_type: ItemKind,
        authoring: Option<&Value>,
        live: Option<&Value>,
    ) -> Self {
        let latest_version = authoring.and_then(version_of).unwrap_or(0);
        let published_version = live.and_then(version_of);
        let is_published = published_version.is_some();
        let is_outdated = published_version.is_some_and(|published| published < latest_version);
        let version_difference = match published_version {
            Some(published) => to_signed(latest_version) - to_signed(published),
            None => to_signed(latest_version),
        };

        let name = authoring
            .and_then(|payload| str_at(payload, &["name"]))
            .or_else(|| live.and_then(|payload| str_at(payload, &["name"])))
            .unwrap_or(UNKNOWN_ITEM_NAME)
            .to_string();

        Self {
            id,
            name,
            path: authoring
                .and_then(|payload| str_at(payload, &["path"]))
                .unwrap_or_default()
                .to_string(),
            latest_version,
            published_version,
            is_published,
            is_outdated,
            version_difference,
            item_type,
            template: authoring
                .and_then(|payload| str_at(payload, &["template", "name"]))
                .map(str::to_string),
            language: authoring
                .and_then(|payload| str_at(payload, &["language", "name"]))
                .or_else(|| live.and_then(|payload| str_at(payload, &["language", "name"])))
                .map(str::to_string),
        }
    }

    /// Record for the empty-report sentinel.
    #[must_use]
    pub fn unknown() -> Self {
        Self::from_payloads(ItemId::unknown(), ItemKind::Current, None, None)
    }
}

fn to_signed(version: u64) -> i64 {
    i64::try_from(version).unwrap_or(i64::MAX)
}

/// Read a version number, accepting numeric strings.
fn version_of(payload: &Value) -> Option<u64> {
    match payload.get("version")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn str_at<'a>(payload: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(payload, |value, key| value.get(*key))?
        .as_str()
        .filter(|s| !s.is_empty())
}

/// Result of validating one query envelope.
#[derive(Debug, Clone)]
pub struct ValidatedEnvelope<'a> {
    /// `false` when the envelope failed, had no response, had no data or
    /// carried GraphQL errors.
    pub valid: bool,
    /// Alias-keyed payloads, present even for some invalid envelopes.
    pub data: Option<&'a Map<String, Value>>,
    pub diagnostics: Vec<String>,
}

impl<'a> ValidatedEnvelope<'a> {
    /// Payload at `alias`, ignoring `null` slots.
    #[must_use]
    pub fn slot(&self, alias: &str) -> Option<&'a Value> {
        self.data?.get(alias).filter(|value| !value.is_null())
    }
}

/// Validate an envelope and extract its data.
///
/// `label` names the query in diagnostics ("Authoring", "Live", ...).
#[must_use]
pub fn validate_envelope<'a>(envelope: &'a QueryEnvelope, label: &str) -> ValidatedEnvelope<'a> {
    let mut diagnostics = Vec::new();

    let response = match envelope {
        QueryEnvelope::Failed { error } => {
            warn!("{} query failed: {}", label, error);
            diagnostics.push(format!("{label} query failed: {error}"));
            return ValidatedEnvelope {
                valid: false,
                data: None,
                diagnostics,
            };
        }
        QueryEnvelope::Response(None) => {
            warn!("{} query returned no response", label);
            diagnostics.push(format!("{label} query returned no response"));
            return ValidatedEnvelope {
                valid: false,
                data: None,
                diagnostics,
            };
        }
        QueryEnvelope::Response(Some(response)) => response,
    };

    let mut valid = true;
    let data = response.data.as_ref();
    if data.is_none() {
        warn!("{} response has no data", label);
        diagnostics.push(format!("{label} response has no data"));
        valid = false;
    }

    for error in response.errors.iter().flatten() {
        warn!("{} GraphQL error: {}", label, error.message);
        diagnostics.push(format!("{label} GraphQL error: {}", error.message));
        valid = false;
    }

    ValidatedEnvelope {
        valid,
        data,
        diagnostics,
    }
}

/// Merge authoring and live results for `ids` by ordinal position.
///
/// Produces exactly one record per identifier, in order. An item is
/// [`ItemKind::Current`] when it equals `current`.
pub fn reconcile(
    authoring: &QueryEnvelope,
    live: &QueryEnvelope,
    ids: &[ItemId],
    current: Option<&ItemId>,
    diagnostics: &mut Diagnostics,
) -> Vec<ProcessedItem> {
    let authoring = validate_envelope(authoring, "Authoring");
    let live = validate_envelope(live, "Live");
    diagnostics.extend(authoring.diagnostics.iter().cloned());
    diagnostics.extend(live.diagnostics.iter().cloned());

    let items: Vec<ProcessedItem> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let alias = item_alias(i);
            let authoring_payload = authoring.slot(&alias);
            let live_payload = live.slot(&alias);

            if authoring_payload.is_none() && authoring.data.is_some() {
                diagnostics.push(format!("Item {id} was not found in authoring"));
            }

            let kind = if current == Some(id) {
                ItemKind::Current
            } else {
                ItemKind::Reference
            };
            ProcessedItem::from_payloads(id.clone(), kind, authoring_payload, live_payload)
        })
        .collect();

    debug!(
        "Reconciled {} item(s) (authoring valid: {}, live valid: {})",
        items.len(),
        authoring.valid,
        live.valid
    );
    items
}
