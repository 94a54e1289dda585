//! End-to-end fetch cycles against in-memory endpoints.

use publish_status::client::LiveClientHandle;
use publish_status::config::Config;
use publish_status::context::{PageContext, walk_context};
use publish_status::core::TransportError;
use publish_status::cycle::FetchCycle;
use publish_status::graphql::{DataSource, GraphQlResponse};
use publish_status::item_id::ItemId;
use publish_status::reconcile::ItemKind;
use publish_status::report::{Summary, assemble_report};
use publish_status::test_utils::{MockTransport, StaticContext, init_test_logging};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::fixtures::*;

/// Authoring endpoint answering path lookups and item queries separately.
fn authoring(resolve: Value, items: Value) -> Arc<MockTransport> {
    Arc::new(MockTransport::new(move |request| {
        let data = if request.query.contains("path0:") { &resolve } else { &items };
        Ok(Some(GraphQlResponse {
            data: data.as_object().cloned(),
            errors: None,
        }))
    }))
}

fn cycle(authoring: Arc<MockTransport>, live: Arc<MockTransport>) -> FetchCycle {
    FetchCycle::new(
        authoring,
        LiveClientHandle::with_transport(live),
        Config::default().authoring_scope(),
    )
}

fn three_authoring_items() -> Value {
    json!({
        "item0": authoring_item("Home", 3),
        "item1": authoring_item("Text", 2),
        "item2": authoring_item("Promo", 1)
    })
}

#[tokio::test]
async fn test_full_cycle_with_resolved_local_path() {
    init_test_logging(None);
    let authoring = authoring(resolved_promo(), three_authoring_items());
    let live = Arc::new(MockTransport::with_data(json!({
        "item0": live_item("Home", 3),
        "item1": live_item("Text", 1)
    })));
    let cycle = cycle(authoring.clone(), live.clone());

    let context = StaticContext::new(page_with_datasources());
    let report = cycle.run(&context, Some("ctx")).await.unwrap();

    let current = report.current_item();
    assert_eq!(current.id.as_str(), PAGE_CANONICAL);
    assert_eq!(current.item_type, ItemKind::Current);
    assert!(current.is_published);
    assert!(!current.is_outdated);
    assert_eq!(current.name, "Home");
    assert_eq!(current.template.as_deref(), Some("Sample Item"));

    let referenced = report.referenced_items();
    assert_eq!(referenced.len(), 2);
    assert_eq!(referenced[0].id.as_str(), TEXT_CANONICAL);
    assert_eq!(referenced[0].item_type, ItemKind::Reference);
    assert!(referenced[0].is_outdated);
    assert_eq!(referenced[0].version_difference, 1);
    assert_eq!(referenced[1].id.as_str(), PROMO_CANONICAL);
    assert!(!referenced[1].is_published);
    assert_eq!(referenced[1].version_difference, 1);

    assert_eq!(
        report.summary(),
        Summary {
            total: 3,
            published: 2,
            unpublished: 1,
            outdated: 1,
        }
    );
    let skipped_query = "Skipped unsupported query datasource: query:./*[@@templatename='Card']";
    assert!(report.diagnostics().contains(&skipped_query.to_string()));

    // Resolution strictly precedes the item query
    let requests = authoring.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].query.contains(&format!("path: \"{PAGE_PATH}/Data/Text 1\"")));
    assert!(requests[1].query.contains("item2: item("));
    assert!(requests.iter().all(|r| r.context_token.as_deref() == Some("ctx")));

    let live_requests = live.requests();
    assert_eq!(live_requests.len(), 1);
    assert_eq!(live_requests[0].source, DataSource::Live);
    assert_eq!(live_requests[0].context_token, None);
    assert!(live_requests[0].query.contains(&format!("item0: item(path: \"{PAGE_ID}\")")));
}

#[tokio::test]
async fn test_without_context_token_paths_stay_unresolved() {
    let authoring = authoring(resolved_promo(), three_authoring_items());
    let live = Arc::new(MockTransport::with_data(json!({})));
    let cycle = cycle(authoring.clone(), live);

    let report = cycle.run(&StaticContext::new(page_with_datasources()), None).await.unwrap();

    assert_eq!(report.referenced_items().len(), 1);
    assert_eq!(authoring.requests().len(), 1);
    assert!(
        report
            .diagnostics()
            .contains(&"Skipped resolving 1 datasource path(s): no context token".to_string())
    );
}

#[tokio::test]
async fn test_resolved_id_already_known_is_not_duplicated() {
    let authoring = authoring(
        json!({ "path0": { "itemId": TEXT_ID } }),
        json!({ "item0": authoring_item("Home", 1), "item1": authoring_item("Text", 1) }),
    );
    let cycle = cycle(authoring.clone(), Arc::new(MockTransport::with_data(json!({}))));

    let context = StaticContext::new(page_with_datasources());
    let report = cycle.run(&context, Some("ctx")).await.unwrap();

    assert_eq!(report.referenced_items().len(), 1);
    assert!(!authoring.requests()[1].query.contains("item2:"));
}

#[tokio::test]
async fn test_resolution_failure_keeps_known_items() {
    let authoring = Arc::new(MockTransport::new(|request| {
        if request.query.contains("path0:") {
            return Err(TransportError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(Some(GraphQlResponse {
            data: json!({ "item0": authoring_item("Home", 2), "item1": authoring_item("Text", 2) })
                .as_object()
                .cloned(),
            errors: None,
        }))
    }));
    let cycle = cycle(authoring, Arc::new(MockTransport::with_data(json!({}))));

    let context = StaticContext::new(page_with_datasources());
    let report = cycle.run(&context, Some("ctx")).await.unwrap();

    assert_eq!(report.summary().total, 2);
    let diagnostics = report.diagnostics().join("\n");
    assert!(diagnostics.contains("Path resolution query failed: Endpoint returned HTTP 500: boom"));
    assert!(
        diagnostics.contains(&format!("Could not resolve datasource path: {PAGE_PATH}/Data/Text 1"))
    );
}

#[tokio::test]
async fn test_live_failure_reports_everything_unpublished() {
    let authoring = authoring(resolved_promo(), three_authoring_items());
    let live = Arc::new(MockTransport::failing(|| TransportError::Unavailable {
        reason: "edge unreachable".to_string(),
    }));
    let cycle = cycle(authoring, live);

    let context = StaticContext::new(page_with_datasources());
    let report = cycle.run(&context, Some("ctx")).await.unwrap();

    let items: Vec<_> = report.items().collect();
    assert_eq!(items.len(), 3);
    for (item, latest) in items.iter().zip([3, 2, 1]) {
        assert_eq!(item.latest_version, latest);
        assert_eq!(item.published_version, None);
        assert!(!item.is_published);
    }
    assert_eq!(report.summary().unpublished, 3);
    assert!(
        report
            .diagnostics()
            .contains(&"Live query failed: Client unavailable: edge unreachable".to_string())
    );
}

#[tokio::test]
async fn test_graphql_errors_do_not_discard_partial_data() {
    let authoring = authoring(json!({}), json!({ "item0": authoring_item("Home", 4) }));
    let live = Arc::new(MockTransport::with_errors(
        json!({ "item0": live_item("Home", 4), "item1": null }),
        &["Could not resolve item {AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE}"],
    ));
    let cycle = cycle(authoring, live);

    let report = cycle.run(&StaticContext::new(page_with_datasources()), None).await.unwrap();

    assert!(report.current_item().is_published);
    let text = &report.referenced_items()[0];
    assert_eq!(text.latest_version, 0);
    assert_eq!(text.published_version, None);
    assert_eq!(text.name, "Unknown");
    let diagnostics = report.diagnostics().join("\n");
    assert!(diagnostics.contains("Live GraphQL error: Could not resolve item"));
    assert!(diagnostics.contains(&format!("Item {TEXT_ID} was not found in authoring")));
}

#[tokio::test]
async fn test_missing_authoring_response_falls_back_to_live_metadata() {
    let authoring = Arc::new(MockTransport::without_response());
    let live = Arc::new(MockTransport::with_data(json!({ "item0": live_item("Home (live)", 2) })));
    let cycle = cycle(authoring, live);

    let report = cycle.run(&StaticContext::new(bare_page()), None).await.unwrap();

    let current = report.current_item();
    assert_eq!(current.latest_version, 0);
    assert_eq!(current.published_version, Some(2));
    assert_eq!(current.name, "Home (live)");
    assert_eq!(current.language.as_deref(), Some("en"));
    assert!(report.diagnostics().contains(&"Authoring query returned no response".to_string()));
}

#[tokio::test]
async fn test_successive_cycles_are_independent() {
    let authoring = authoring(json!({}), json!({ "item0": authoring_item("Home", 2) }));
    let live = Arc::new(MockTransport::with_data(json!({ "item0": live_item("Home", 2) })));
    let cycle = cycle(authoring, live);
    let context = StaticContext::new(bare_page());

    let first = cycle.run(&context, None).await.unwrap();
    cycle.shutdown().await;
    let second = cycle.run(&context, None).await.unwrap();

    assert_eq!(first.current_item(), second.current_item());
    assert!(second.generated_at() >= first.generated_at());
}

#[test]
fn test_walk_of_bare_page() {
    let result = walk_context(&PageContext::new(bare_page()));
    assert_eq!(result.item_ids, vec![ItemId::parse(PAGE_CANONICAL)]);
    assert!(result.symbolic_paths.is_empty());
    assert_eq!(result.current_path, PAGE_PATH);
}

#[test]
fn test_walk_deduplicates_across_renderings() {
    let result = walk_context(&PageContext::new(page_with_datasources()));
    let ids: Vec<&str> = result.item_ids.iter().map(ItemId::as_str).collect();
    assert_eq!(ids, vec![PAGE_CANONICAL, TEXT_CANONICAL]);
    assert_eq!(result.symbolic_paths, vec!["Text 1"]);
}

#[test]
fn test_empty_report_is_sentinel() {
    let report = assemble_report(Vec::new(), Vec::new());
    assert_eq!(report.current_item().id.as_str(), "unknown");
    assert!(report.referenced_items().is_empty());
    assert_eq!(report.summary(), Summary::default());
}
