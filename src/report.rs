//! Final publish-status report for one fetch cycle.
//!
//! A [`Report`] splits the reconciled items into the current page and the
//! items it references. Summary counts are never stored: [`Report::summary`]
//! derives them from the items every time it is called.
//!
//! When no items were reconciled the report carries a sentinel current item
//! with the reserved identifier `unknown` (see [`crate::item_id::ItemId::unknown`]). That
//! identifier is lowercase and can never equal a canonical identifier, so the
//! sentinel is not mistaken for a real item, and it is left out of the
//! summary.

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Serialize, Serializer};
use std::fmt::Write as _;

use crate::reconcile::{ItemKind, ProcessedItem};

/// Counts derived from a report's items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub published: usize,
    pub unpublished: usize,
    pub outdated: usize,
}

impl Summary {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a ProcessedItem>) -> Self {
        items.into_iter().fold(Self::default(), |mut summary, item| {
            summary.total += 1;
            if item.is_published {
                summary.published += 1;
            } else {
                summary.unpublished += 1;
            }
            if item.is_outdated {
                summary.outdated += 1;
            }
            summary
        })
    }

    /// `true` when every item is published and up to date.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.unpublished == 0 && self.outdated == 0
    }
}

/// Publish status of the current page and everything it references.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    current_item: ProcessedItem,
    referenced_items: Vec<ProcessedItem>,
    diagnostics: Vec<String>,
    generated_at: DateTime<Utc>,
}

impl Report {
    #[must_use]
    pub const fn current_item(&self) -> &ProcessedItem {
        &self.current_item
    }

    #[must_use]
    pub fn referenced_items(&self) -> &[ProcessedItem] {
        &self.referenced_items
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// `true` when the current item is the empty-report sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current_item.id.is_unknown()
    }

    /// Every real item, current first.
    pub fn items(&self) -> impl Iterator<Item = &ProcessedItem> {
        let current = (!self.is_empty()).then_some(&self.current_item);
        current.into_iter().chain(&self.referenced_items)
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::from_items(self.items())
    }

    /// Human-readable table followed by the summary.
    #[must_use]
    pub fn render_table(&self) -> String {
        let mut out = String::new();

        if self.is_empty() {
            let _ = writeln!(out, "{}", "No items found for the current page.".yellow());
            return out;
        }

        let _ = writeln!(
            out,
            "{:<10} {:<30} {:<40} {:<8} {:<10} {:<12}",
            "Type".bold(),
            "Name".bold(),
            "ID".bold(),
            "Latest".bold(),
            "Published".bold(),
            "Status".bold()
        );
        let _ = writeln!(out, "{}", "─".repeat(115));

        for item in self.items() {
            let published = item
                .published_version
                .map_or_else(|| "-".to_string(), |version| version.to_string());
            let status = if item.is_outdated {
                format!("outdated (+{})", item.version_difference).yellow()
            } else if item.is_published {
                "published".green()
            } else {
                "unpublished".red()
            };

            let _ = writeln!(
                out,
                "{:<10} {:<30} {:<40} {:<8} {:<10} {}",
                item.item_type.to_string().bright_black(),
                item.name,
                item.id,
                item.latest_version,
                published,
                status
            );
        }

        let summary = self.summary();
        let _ = writeln!(out, "\n{}", "Summary:".bold());
        let _ = writeln!(out, "  Total items: {}", summary.total);
        let _ = writeln!(out, "  {} published", summary.published.to_string().green());
        if summary.outdated > 0 {
            let _ = writeln!(out, "  {} outdated", summary.outdated.to_string().yellow());
        }
        if summary.unpublished > 0 {
            let _ = writeln!(out, "  {} unpublished", summary.unpublished.to_string().red());
        }

        if !self.diagnostics.is_empty() {
            let _ = writeln!(out, "\n{}", "Diagnostics:".bold());
            for message in &self.diagnostics {
                let _ = writeln!(out, "  {} {}", "!".yellow(), message);
            }
        }

        out
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportView<'a> {
    current_item: &'a ProcessedItem,
    referenced_items: &'a [ProcessedItem],
    summary: Summary,
    diagnostics: &'a [String],
    generated_at: DateTime<Utc>,
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ReportView {
            current_item: &self.current_item,
            referenced_items: &self.referenced_items,
            summary: self.summary(),
            diagnostics: &self.diagnostics,
            generated_at: self.generated_at,
        }
        .serialize(serializer)
    }
}

/// Split reconciled items into the current item and its references.
///
/// The first [`ItemKind::Current`] item becomes the current item; when none
/// is flagged, the first item is used. An empty list yields the sentinel.
#[must_use]
pub fn assemble_report(mut items: Vec<ProcessedItem>, diagnostics: Vec<String>) -> Report {
    let current_item = if items.is_empty() {
        ProcessedItem::unknown()
    } else {
        let index = items.iter().position(|item| item.item_type == ItemKind::Current).unwrap_or(0);
        items.remove(index)
    };

    Report {
        current_item,
        referenced_items: items,
        diagnostics,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_id::ItemId;
    use serde_json::json;

    fn item(raw: &str, kind: ItemKind, latest: u64, published: Option<u64>) -> ProcessedItem {
        let authoring = json!({ "version": latest, "name": raw });
        let live = published.map(|version| json!({ "version": version }));
        ProcessedItem::from_payloads(ItemId::parse(raw), kind, Some(&authoring), live.as_ref())
    }

    #[test]
    fn test_empty_list_yields_sentinel() {
        let report = assemble_report(Vec::new(), Vec::new());
        assert!(report.is_empty());
        assert_eq!(report.current_item().id, ItemId::unknown());
        assert_eq!(report.current_item().id.as_str(), "unknown");
        assert_eq!(report.current_item().latest_version, 0);
        assert_eq!(report.current_item().published_version, None);
        assert!(!report.current_item().is_published);
        assert!(report.referenced_items().is_empty());
        assert_eq!(report.summary(), Summary::default());
    }

    #[test]
    fn test_current_item_is_split_out() {
        let report = assemble_report(
            vec![
                item("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB", ItemKind::Reference, 2, Some(2)),
                item("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", ItemKind::Current, 3, Some(1)),
                item("CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC", ItemKind::Reference, 1, None),
            ],
            Vec::new(),
        );
        assert_eq!(report.current_item().id.as_str(), "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
        assert_eq!(report.referenced_items().len(), 2);
        assert_eq!(
            report.summary(),
            Summary {
                total: 3,
                published: 2,
                unpublished: 1,
                outdated: 1,
            }
        );
        assert!(!report.summary().is_clean());
    }

    #[test]
    fn test_first_item_used_when_none_flagged() {
        let report = assemble_report(
            vec![
                item("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB", ItemKind::Reference, 2, Some(2)),
                item("CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC", ItemKind::Reference, 1, Some(1)),
            ],
            Vec::new(),
        );
        assert_eq!(report.current_item().id.as_str(), "BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB");
        assert_eq!(report.referenced_items().len(), 1);
        assert!(report.summary().is_clean());
    }

    #[test]
    fn test_json_includes_derived_summary() {
        let report = assemble_report(
            vec![item("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", ItemKind::Current, 8, Some(5))],
            vec!["Live GraphQL error: slow".to_string()],
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["currentItem"]["latestVersion"], 8);
        assert_eq!(value["currentItem"]["isOutdated"], true);
        assert_eq!(value["currentItem"]["itemType"], "current");
        assert_eq!(value["summary"]["outdated"], 1);
        assert_eq!(value["diagnostics"][0], "Live GraphQL error: slow");
        assert!(value["generatedAt"].is_string());
    }

    #[test]
    fn test_render_table_lists_items_and_diagnostics() {
        let report = assemble_report(
            vec![
                item("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", ItemKind::Current, 8, Some(5)),
                item("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB", ItemKind::Reference, 1, None),
            ],
            vec!["Could not resolve datasource path: /x".to_string()],
        );
        let table = report.render_table();
        assert!(table.contains("{AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA}"));
        assert!(table.contains("outdated (+3)"));
        assert!(table.contains("unpublished"));
        assert!(table.contains("Total items: 2"));
        assert!(table.contains("Could not resolve datasource path: /x"));

        let empty = assemble_report(Vec::new(), Vec::new()).render_table();
        assert!(empty.contains("No items found"));
    }
}
