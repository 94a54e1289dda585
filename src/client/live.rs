//! Lazily initialised client for the live data source.
//!
//! The live endpoint is reached through its own transport, separate from
//! the authoring one. [`LiveClientHandle`] owns that transport: it builds it
//! on first use, retries the build with exponential backoff, and drops it on
//! [`LiveClientHandle::shutdown`]. The next use after a shutdown builds a
//! fresh client.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{debug, info, warn};

use super::{EndpointAuth, GraphQlTransport, HttpTransport};
use crate::constants::{DEFAULT_RETRY_ATTEMPTS, MAX_BACKOFF_DELAY_MS, STARTING_BACKOFF_DELAY_MS};
use crate::core::{PublishStatusError, TransportError};

/// Builds a live transport. Called once per initialisation attempt.
pub type TransportConnector =
    Arc<dyn Fn() -> Result<Arc<dyn GraphQlTransport>, TransportError> + Send + Sync>;

/// Backoff settings for live client initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Total attempts, including the first one.
    pub attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: STARTING_BACKOFF_DELAY_MS,
            max_delay_ms: MAX_BACKOFF_DELAY_MS,
            attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// Delays between attempts, growing by powers of `initial_delay_ms`
    /// (doubled) and capped at `max_delay_ms`. With the defaults: 20ms, 200ms,
    /// 500ms, 500ms.
    fn strategy(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(self.initial_delay_ms.max(1))
            .factor(2)
            .max_delay(Duration::from_millis(self.max_delay_ms))
            .take(self.attempts.saturating_sub(1))
    }
}

/// Owned, lazily initialised handle to the live transport.
pub struct LiveClientHandle {
    connector: TransportConnector,
    retry: RetryPolicy,
    client: Mutex<Option<Arc<dyn GraphQlTransport>>>,
}

impl std::fmt::Debug for LiveClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveClientHandle").field("retry", &self.retry).finish_non_exhaustive()
    }
}

impl LiveClientHandle {
    pub fn new(connector: TransportConnector, retry: RetryPolicy) -> Self {
        Self {
            connector,
            retry,
            client: Mutex::new(None),
        }
    }

    /// Handle whose client is an [`HttpTransport`] for `endpoint`.
    pub fn http(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        let endpoint = endpoint.into();
        let auth = api_key.map_or(EndpointAuth::None, EndpointAuth::ApiKey);
        let connector: TransportConnector = Arc::new(move || {
            let transport = HttpTransport::new(endpoint.clone(), auth.clone(), timeout)?;
            Ok(Arc::new(transport) as Arc<dyn GraphQlTransport>)
        });
        Self::new(connector, retry)
    }

    /// Handle around an already built transport.
    pub fn with_transport(transport: Arc<dyn GraphQlTransport>) -> Self {
        let connector: TransportConnector = Arc::new(move || Ok(Arc::clone(&transport)));
        Self::new(connector, RetryPolicy::default())
    }

    /// The live transport, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`PublishStatusError::LiveClientUnavailable`] when every
    /// initialisation attempt failed.
    pub async fn get(&self) -> Result<Arc<dyn GraphQlTransport>, PublishStatusError> {
        let mut guard = self.client.lock().await;
        if let Some(client) = guard.as_ref() {
            return Ok(Arc::clone(client));
        }

        let attempts = AtomicUsize::new(0);
        let result = Retry::start(self.retry.strategy(), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            let connector = Arc::clone(&self.connector);
            async move {
                debug!("Initialising live client (attempt {})", attempt);
                connector().inspect_err(|e| {
                    warn!("Live client initialisation attempt {} failed: {}", attempt, e);
                })
            }
        })
        .await;

        match result {
            Ok(client) => {
                info!("Live client initialised");
                *guard = Some(Arc::clone(&client));
                Ok(client)
            }
            Err(e) => Err(PublishStatusError::LiveClientUnavailable {
                attempts: attempts.load(Ordering::SeqCst),
                reason: e.to_string(),
            }),
        }
    }

    /// Drop the live transport. The next [`get`](Self::get) rebuilds it.
    pub async fn shutdown(&self) {
        if self.client.lock().await.take().is_some() {
            debug!("Live client shut down");
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.client.lock().await.is_some()
    }
}
