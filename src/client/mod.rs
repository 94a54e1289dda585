//! Transports for the authoring and live GraphQL endpoints.
//!
//! The core never talks HTTP directly. It builds query text (see
//! [`crate::graphql`]) and hands a [`GraphQlRequest`] to a
//! [`GraphQlTransport`]. Two transports take part in a fetch cycle:
//!
//! - the **authoring** transport, shared by item queries and path resolution,
//!   passed in by the caller;
//! - the **live** transport, reached through a [`LiveClientHandle`] that the
//!   cycle owns. The live data source serves published content under
//!   different routing and trust rules, so it gets its own client.
//!
//! # Modules
//!
//! - [`http`] - `reqwest`-backed transport
//! - [`live`] - lazily initialised, retrying live client handle

pub mod http;
pub mod live;

use async_trait::async_trait;

use crate::core::TransportError;
use crate::graphql::{GraphQlRequest, GraphQlResponse};

pub use http::{EndpointAuth, HttpTransport};
pub use live::{LiveClientHandle, RetryPolicy, TransportConnector};

/// Executes GraphQL requests against one endpoint.
///
/// `Ok(None)` means the endpoint answered without a top-level response body.
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn execute(
        &self,
        request: &GraphQlRequest,
    ) -> Result<Option<GraphQlResponse>, TransportError>;
}
