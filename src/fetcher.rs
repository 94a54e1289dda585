//! Concurrent authoring and live queries for one identifier list.

use tracing::{debug, warn};

use crate::client::{GraphQlTransport, LiveClientHandle};
use crate::graphql::{
    AuthoringScope, DataSource, GraphQlRequest, QueryEnvelope, authoring_items_query,
    live_items_query,
};
use crate::item_id::ItemId;

/// Raw envelopes from both endpoints, in no particular state.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedEnvelopes {
    pub authoring: QueryEnvelope,
    pub live: QueryEnvelope,
}

impl FetchedEnvelopes {
    /// Envelopes for an empty identifier list.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            authoring: QueryEnvelope::empty(),
            live: QueryEnvelope::empty(),
        }
    }
}

/// Query both endpoints for `ids` at the same time.
///
/// An empty list returns [`FetchedEnvelopes::empty`] without issuing any
/// request. Otherwise both queries run concurrently and both are awaited;
/// a failure on one side is captured in its envelope and does not affect
/// the other. The context token is sent with the authoring query only.
pub async fn fetch_both(
    authoring: &dyn GraphQlTransport,
    live: &LiveClientHandle,
    ids: &[ItemId],
    context_token: Option<&str>,
    scope: &AuthoringScope,
) -> FetchedEnvelopes {
    if ids.is_empty() {
        debug!("No items to fetch");
        return FetchedEnvelopes::empty();
    }

    let authoring_request = GraphQlRequest {
        source: DataSource::Authoring,
        query: authoring_items_query(ids, scope),
        context_token: context_token.map(str::to_string),
    };
    let live_request = GraphQlRequest {
        source: DataSource::Live,
        query: live_items_query(ids),
        context_token: None,
    };

    let authoring_fut = async {
        QueryEnvelope::from_result(authoring.execute(&authoring_request).await)
    };
    let live_fut = async {
        match live.get().await {
            Ok(client) => QueryEnvelope::from_result(client.execute(&live_request).await),
            Err(e) => {
                warn!("{}", e);
                QueryEnvelope::Failed {
                    error: e.to_string(),
                }
            }
        }
    };

    let (authoring, live) = tokio::join!(authoring_fut, live_fut);
    debug!(
        "Fetched {} item(s): authoring {}, live {}",
        ids.len(),
        if authoring.is_failed() { "failed" } else { "ok" },
        if live.is_failed() { "failed" } else { "ok" }
    );

    FetchedEnvelopes {
        authoring,
        live,
    }
}
