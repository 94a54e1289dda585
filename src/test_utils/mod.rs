//! Test utilities for publish-status
//!
//! In-memory stand-ins for the external capabilities a fetch cycle consumes,
//! so cycles can be exercised without a network:
//!
//! - [`MockTransport`] - a [`GraphQlTransport`] answering from a closure and
//!   recording every request it receives
//! - [`StaticContext`] - a [`ContextSource`] returning a fixed document, or
//!   failing
//!
//! # Example
//!
//! ```rust,no_run
//! use publish_status::test_utils::{MockTransport, StaticContext};
//! use serde_json::json;
//!
//! let authoring = MockTransport::with_data(json!({ "item0": { "version": 3 } }));
//! let context = StaticContext::new(json!({
//!     "pageInfo": { "id": "{5ED52178-8F06-49BE-9D4C-F191E650189E}" }
//! }));
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Mutex, Once, PoisonError};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::client::GraphQlTransport;
use crate::context::ContextSource;
use crate::core::TransportError;
use crate::graphql::{GraphQlError, GraphQlRequest, GraphQlResponse};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

type Responder =
    Box<dyn Fn(&GraphQlRequest) -> Result<Option<GraphQlResponse>, TransportError> + Send + Sync>;

/// Transport that answers from a closure and records requests.
pub struct MockTransport {
    responder: Responder,
    requests: Mutex<Vec<GraphQlRequest>>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&GraphQlRequest) -> Result<Option<GraphQlResponse>, TransportError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers `{ "data": data }`.
    pub fn with_data(data: Value) -> Self {
        Self::with_response(GraphQlResponse {
            data: data.as_object().cloned(),
            errors: None,
        })
    }

    /// Always answers `{ "data": data, "errors": [...] }`.
    pub fn with_errors(data: Value, messages: &[&str]) -> Self {
        Self::with_response(GraphQlResponse {
            data: data.as_object().cloned(),
            errors: Some(
                messages
                    .iter()
                    .map(|message| GraphQlError {
                        message: (*message).to_string(),
                    })
                    .collect(),
            ),
        })
    }

    pub fn with_response(response: GraphQlResponse) -> Self {
        Self::new(move |_| Ok(Some(response.clone())))
    }

    /// Completes without a response body.
    pub fn without_response() -> Self {
        Self::new(|_| Ok(None))
    }

    /// Fails every request with the error built by `error`.
    pub fn failing<F>(error: F) -> Self
    where
        F: Fn() -> TransportError + Send + Sync + 'static,
    {
        Self::new(move |_| Err(error()))
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<GraphQlRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl GraphQlTransport for MockTransport {
    async fn execute(
        &self,
        request: &GraphQlRequest,
    ) -> Result<Option<GraphQlResponse>, TransportError> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request.clone());
        (self.responder)(request)
    }
}

/// Context source returning a fixed document.
#[derive(Debug, Clone)]
pub struct StaticContext {
    document: Result<Value, String>,
}

impl StaticContext {
    pub const fn new(document: Value) -> Self {
        Self {
            document: Ok(document),
        }
    }

    /// A source whose query always fails with `reason`.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            document: Err(reason.to_string()),
        }
    }
}

#[async_trait]
impl ContextSource for StaticContext {
    async fn query_context(&self) -> Result<Value, TransportError> {
        self.document.clone().map_err(|reason| TransportError::Unavailable {
            reason,
        })
    }
}
