//! Resolution of symbolic datasource paths into item identifiers.
//!
//! Page-relative datasources (`local:/Data/Text 1`) name an item by its
//! position under the current page. They are turned into absolute content
//! paths and looked up in one batched authoring query, aliased `path0`,
//! `path1`, ... by ordinal.
//!
//! Page-relative names are assumed to live in the page's `Data` folder:
//! `Text 1` under `/sitecore/content/Home` becomes
//! `/sitecore/content/Home/Data/Text 1`. Absolute `/sitecore/...` paths are
//! looked up as they are.
//!
//! Resolution never fails. A transport failure maps every path to `None`
//! and the fetch cycle carries on with the identifiers it already has.

use tracing::{debug, warn};

use crate::client::GraphQlTransport;
use crate::constants::{CONTENT_PATH_PREFIX, DATA_FOLDER};
use crate::core::Diagnostics;
use crate::datasource::local_item_name;
use crate::graphql::{
    AuthoringScope, DataSource, GraphQlRequest, QueryEnvelope, path_alias, resolve_paths_query,
};
use crate::item_id::ItemId;
use crate::reconcile::validate_envelope;

/// Outcome for one symbolic path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// The path as it appeared in the datasource.
    pub symbolic: String,
    /// The absolute content path that was looked up.
    pub absolute: String,
    /// Identifier of the item at `absolute`, if any.
    pub item_id: Option<ItemId>,
}

/// Absolute content path for a symbolic path under `base_path`.
#[must_use]
pub fn build_absolute_path(base_path: &str, symbolic: &str) -> String {
    if symbolic.starts_with(CONTENT_PATH_PREFIX) {
        return symbolic.to_string();
    }

    format!(
        "{}/{}/{}",
        base_path.trim_end_matches('/'),
        DATA_FOLDER,
        local_item_name(symbolic)
    )
}

/// Look up identifiers for `paths` with a single authoring query.
///
/// Returns one entry per input path, in input order. Problems are recorded
/// in `diagnostics`; nothing is returned as an error.
pub async fn resolve_local_paths(
    transport: &dyn GraphQlTransport,
    paths: &[String],
    base_path: &str,
    context_token: &str,
    scope: &AuthoringScope,
    diagnostics: &mut Diagnostics,
) -> Vec<ResolvedPath> {
    if paths.is_empty() {
        return Vec::new();
    }

    let absolute: Vec<String> =
        paths.iter().map(|path| build_absolute_path(base_path, path)).collect();
    debug!("Resolving {} symbolic path(s) under {}", paths.len(), base_path);

    let request = GraphQlRequest {
        source: DataSource::Authoring,
        query: resolve_paths_query(&absolute, scope),
        context_token: Some(context_token.to_string()),
    };
    let envelope = QueryEnvelope::from_result(transport.execute(&request).await);
    let validated = validate_envelope(&envelope, "Path resolution");
    diagnostics.extend(validated.diagnostics.iter().cloned());

    if validated.data.is_none() {
        warn!("Path resolution produced no data, {} path(s) left unresolved", paths.len());
    }

    paths
        .iter()
        .zip(absolute)
        .enumerate()
        .map(|(i, (symbolic, absolute))| {
            let item_id = validated
                .slot(&path_alias(i))
                .and_then(|payload| payload.get("itemId"))
                .and_then(|value| value.as_str())
                .filter(|raw| !raw.trim().is_empty())
                .map(ItemId::parse);

            match &item_id {
                Some(id) => debug!("Resolved {} to {}", absolute, id),
                None => {
                    diagnostics.push(format!("Could not resolve datasource path: {absolute}"));
                }
            }

            ResolvedPath {
                symbolic: symbolic.clone(),
                absolute,
                item_id,
            }
        })
        .collect()
}
