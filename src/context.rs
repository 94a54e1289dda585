//! Page context discovery.
//!
//! The page context is an externally owned JSON document describing the page
//! open in the editor. Its schema is not contractually fixed, so it is kept
//! as an opaque [`Value`] and read only through the optional lookups on
//! [`PageContext`]. A missing or malformed field never fails; it simply
//! contributes nothing.
//!
//! [`walk_context`] collects everything a fetch cycle needs from it:
//!
//! 1. the current item identifier, looked up as `itemId`, `id`, `ID`,
//!    `itemID` in `pageInfo`, then `siteInfo`, then the top level;
//! 2. the current page path (`pageInfo.path`);
//! 3. every datasource referenced by the presentation details
//!    (`pageInfo.presentationDetails`, a JSON string or an object), read from
//!    `devices[].renderings[]` and `devices[].placeholders[].renderings[]`.
//!
//! ```rust
//! use publish_status::context::{PageContext, walk_context};
//! use serde_json::json;
//!
//! let context = PageContext::new(json!({
//!     "pageInfo": {
//!         "id": "{5ED52178-8F06-49BE-9D4C-F191E650189E}",
//!         "path": "/sitecore/content/Home"
//!     }
//! }));
//! let walked = walk_context(&context);
//! assert_eq!(walked.item_ids[0].as_str(), "5ED521788F0649BE9D4CF191E650189E");
//! assert!(walked.symbolic_paths.is_empty());
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::core::{Diagnostics, TransportError};
use crate::datasource::parse_datasource_value;
use crate::item_id::ItemId;

const PAGE_INFO_KEY: &str = "pageInfo";
const SITE_INFO_KEY: &str = "siteInfo";
const PATH_KEY: &str = "path";
const PRESENTATION_DETAILS_KEY: &str = "presentationDetails";
const DEVICES_KEY: &str = "devices";
const RENDERINGS_KEY: &str = "renderings";
const PLACEHOLDERS_KEY: &str = "placeholders";

/// Identifier field names, in lookup order.
const ID_FIELDS: [&str; 4] = ["itemId", "id", "ID", "itemID"];

/// Datasource field names on a rendering, in lookup order.
const DATASOURCE_FIELDS: [&str; 2] = ["dataSource", "datasource"];

/// Provides the page context document for a fetch cycle.
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn query_context(&self) -> Result<Value, TransportError>;
}

/// Reads the page context from a JSON file, or stdin for `-`.
#[derive(Debug, Clone)]
pub struct FileContextSource {
    path: PathBuf,
}

impl FileContextSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

#[async_trait]
impl ContextSource for FileContextSource {
    async fn query_context(&self) -> Result<Value, TransportError> {
        let content = if self.is_stdin() {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        } else {
            debug!("Reading page context from {}", self.path.display());
            tokio::fs::read_to_string(&self.path).await?
        };

        Ok(serde_json::from_str(&content)?)
    }
}

/// Read-only view over a page context document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    document: Value,
}

impl PageContext {
    #[must_use]
    pub const fn new(document: Value) -> Self {
        Self {
            document,
        }
    }

    #[must_use]
    pub const fn document(&self) -> &Value {
        &self.document
    }

    /// The `pageInfo` section, when present and an object.
    #[must_use]
    pub fn page_info(&self) -> Option<&Map<String, Value>> {
        self.document.get(PAGE_INFO_KEY)?.as_object()
    }

    /// The `siteInfo` section, when present and an object.
    #[must_use]
    pub fn site_info(&self) -> Option<&Map<String, Value>> {
        self.document.get(SITE_INFO_KEY)?.as_object()
    }

    /// Current page path, empty when absent.
    #[must_use]
    pub fn current_path(&self) -> String {
        self.page_info()
            .and_then(|info| info.get(PATH_KEY))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Current item identifier from `pageInfo`, `siteInfo`, then the top level.
    #[must_use]
    pub fn current_item_id(&self) -> Option<ItemId> {
        self.page_info()
            .and_then(find_id)
            .or_else(|| self.site_info().and_then(find_id))
            .or_else(|| self.document.as_object().and_then(find_id))
    }

    /// Presentation details as a structured value.
    ///
    /// A string payload is parsed as JSON. Parse failures are recorded in
    /// `diagnostics` and yield `None`.
    pub fn presentation_details(&self, diagnostics: &mut Diagnostics) -> Option<Value> {
        let raw = self.page_info()?.get(PRESENTATION_DETAILS_KEY)?;
        match raw {
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => match serde_json::from_str(text) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Failed to parse presentation details: {}", e);
                    diagnostics.push(format!("Failed to parse presentation details: {e}"));
                    None
                }
            },
            Value::Object(_) => Some(raw.clone()),
            _ => None,
        }
    }
}

fn find_id(section: &Map<String, Value>) -> Option<ItemId> {
    ID_FIELDS
        .iter()
        .filter_map(|field| section.get(*field))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|raw| !raw.is_empty())
        .map(ItemId::parse)
}

/// Everything discovered in one page context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkResult {
    /// Deduplicated identifiers, current item first.
    pub item_ids: Vec<ItemId>,
    /// Deduplicated symbolic paths in discovery order.
    pub symbolic_paths: Vec<String>,
    /// Path of the current page, empty when unknown.
    pub current_path: String,
    /// Dropped segments and parse failures seen while walking.
    pub diagnostics: Vec<String>,
}

impl WalkResult {
    /// `true` when no current item was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    /// The anchor item, always the first identifier.
    #[must_use]
    pub fn current_item(&self) -> Option<&ItemId> {
        self.item_ids.first()
    }
}

#[derive(Default)]
struct Collector {
    ids: Vec<ItemId>,
    paths: Vec<String>,
    diagnostics: Diagnostics,
}

impl Collector {
    fn visit_rendering(&mut self, rendering: &Value) {
        // An empty `dataSource` does not hide a populated `datasource`
        let Some(value) = DATASOURCE_FIELDS
            .iter()
            .filter_map(|field| rendering.get(*field))
            .find(|value| value.as_str().is_some_and(|s| !s.trim().is_empty()))
        else {
            return;
        };

        let parsed = parse_datasource_value(value);
        for id in parsed.direct_ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
        for path in parsed.symbolic_paths {
            if !self.paths.contains(&path) {
                self.paths.push(path);
            }
        }
        for skipped in &parsed.skipped {
            self.diagnostics.push(skipped.describe());
        }
    }

    fn visit_renderings(&mut self, container: &Value) {
        for rendering in array_at(container, RENDERINGS_KEY) {
            self.visit_rendering(rendering);
        }
    }

    fn visit_device(&mut self, device: &Value) {
        self.visit_renderings(device);
        // Placeholders nest renderings one level deep only
        for placeholder in array_at(device, PLACEHOLDERS_KEY) {
            self.visit_renderings(placeholder);
        }
    }
}

fn array_at<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

/// Collect the current item, its path and every referenced datasource.
///
/// Returns an empty result when there is no `pageInfo` section or no
/// current item identifier can be found. The current item is always the
/// first identifier, whether or not a rendering also references it.
#[must_use]
pub fn walk_context(context: &PageContext) -> WalkResult {
    if context.page_info().is_none() {
        debug!("Page context has no pageInfo section");
        return WalkResult::default();
    }

    let current_path = context.current_path();
    let mut collector = Collector::default();

    if let Some(details) = context.presentation_details(&mut collector.diagnostics) {
        for device in array_at(&details, DEVICES_KEY) {
            collector.visit_device(device);
        }
    }

    let Some(current) = context.current_item_id() else {
        debug!("No current item identifier in page context");
        return WalkResult {
            diagnostics: collector.diagnostics.into_messages(),
            ..WalkResult::default()
        };
    };

    let mut item_ids = Vec::with_capacity(collector.ids.len() + 1);
    item_ids.push(current.clone());
    item_ids.extend(collector.ids.into_iter().filter(|id| *id != current));

    debug!(
        "Walked page context: {} item(s), {} symbolic path(s)",
        item_ids.len(),
        collector.paths.len()
    );

    WalkResult {
        item_ids,
        symbolic_paths: collector.paths,
        current_path,
        diagnostics: collector.diagnostics.into_messages(),
    }
}
