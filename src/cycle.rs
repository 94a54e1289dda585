//! One complete fetch cycle: context to report.
//!
//! The stages run strictly in order, except for the two endpoint queries,
//! which run concurrently:
//!
//! ```text
//! query context -> walk -> resolve symbolic paths -> fetch (authoring || live)
//!               -> reconcile -> assemble report
//! ```
//!
//! Path resolution must finish before the fetch starts because resolved
//! identifiers are appended to the list being fetched. Every cycle builds its
//! own identifier list and item records, so concurrent cycles never share
//! state; a newer report simply replaces an older one.

use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::client::{EndpointAuth, GraphQlTransport, HttpTransport, LiveClientHandle};
use crate::config::Config;
use crate::context::{ContextSource, PageContext, walk_context};
use crate::core::{Diagnostics, PublishStatusError, TransportError};
use crate::fetcher::fetch_both;
use crate::graphql::AuthoringScope;
use crate::reconcile::reconcile;
use crate::report::{Report, assemble_report};
use crate::resolver::resolve_local_paths;

/// Runs fetch cycles against an authoring transport and a live client.
///
/// The cycle owns the live client handle. Call [`FetchCycle::shutdown`] to
/// release the live client; the next run builds a new one.
pub struct FetchCycle {
    authoring: Arc<dyn GraphQlTransport>,
    live: LiveClientHandle,
    scope: AuthoringScope,
}

impl std::fmt::Debug for FetchCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCycle")
            .field("live", &self.live)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl FetchCycle {
    pub fn new(
        authoring: Arc<dyn GraphQlTransport>,
        live: LiveClientHandle,
        scope: AuthoringScope,
    ) -> Self {
        Self {
            authoring,
            live,
            scope,
        }
    }

    /// Build HTTP transports for the configured endpoints.
    ///
    /// The live client is not connected until the first run needs it.
    ///
    /// # Errors
    ///
    /// Returns an error if the authoring HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let timeout = config.network.request_timeout();
        let auth = config.authoring.token.clone().map_or(EndpointAuth::None, EndpointAuth::Bearer);
        let authoring = HttpTransport::new(config.authoring.endpoint.clone(), auth, timeout)?;
        let live = LiveClientHandle::http(
            config.live.endpoint.clone(),
            config.live.api_key.clone(),
            timeout,
            config.network.retry_policy(),
        );

        Ok(Self::new(Arc::new(authoring), live, config.authoring_scope()))
    }

    #[must_use]
    pub const fn live_client(&self) -> &LiveClientHandle {
        &self.live
    }

    /// Release the live client.
    pub async fn shutdown(&self) {
        self.live.shutdown().await;
    }

    /// Run one cycle and return its report.
    ///
    /// # Errors
    ///
    /// - [`PublishStatusError::ContextUnavailable`] if `source` fails
    /// - [`PublishStatusError::MissingAnchor`] if the context names no
    ///   current item
    ///
    /// Every other problem is recorded in [`Report::diagnostics`].
    pub async fn run(
        &self,
        source: &dyn ContextSource,
        context_token: Option<&str>,
    ) -> Result<Report, PublishStatusError> {
        let cycle_id = Uuid::new_v4();
        let span = info_span!("fetch_cycle", %cycle_id);
        self.run_inner(source, context_token).instrument(span).await
    }

    async fn run_inner(
        &self,
        source: &dyn ContextSource,
        context_token: Option<&str>,
    ) -> Result<Report, PublishStatusError> {
        let document = source.query_context().await.map_err(|e| {
            PublishStatusError::ContextUnavailable {
                reason: e.to_string(),
            }
        })?;

        let walked = walk_context(&PageContext::new(document));
        if walked.is_empty() {
            return Err(PublishStatusError::MissingAnchor);
        }

        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(walked.diagnostics.iter().cloned());
        let mut ids = walked.item_ids.clone();

        if !walked.symbolic_paths.is_empty() {
            match context_token {
                Some(token) => {
                    let resolved = resolve_local_paths(
                        self.authoring.as_ref(),
                        &walked.symbolic_paths,
                        &walked.current_path,
                        token,
                        &self.scope,
                        &mut diagnostics,
                    )
                    .await;
                    for id in resolved.into_iter().filter_map(|path| path.item_id) {
                        if !ids.contains(&id) {
                            ids.push(id);
                        }
                    }
                }
                None => {
                    debug!("No context token, leaving symbolic paths unresolved");
                    diagnostics.push(format!(
                        "Skipped resolving {} datasource path(s): no context token",
                        walked.symbolic_paths.len()
                    ));
                }
            }
        }

        info!("Checking publish status of {} item(s)", ids.len());
        let fetched =
            fetch_both(self.authoring.as_ref(), &self.live, &ids, context_token, &self.scope)
                .await;

        let items = reconcile(
            &fetched.authoring,
            &fetched.live,
            &ids,
            walked.current_item(),
            &mut diagnostics,
        );
        let report = assemble_report(items, diagnostics.into_messages());

        let summary = report.summary();
        info!(
            "Cycle finished: {} published, {} outdated, {} unpublished",
            summary.published, summary.outdated, summary.unpublished
        );
        Ok(report)
    }
}
