//! HTTP transport for GraphQL endpoints.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

use super::GraphQlTransport;
use crate::constants::{CONTEXT_ID_PARAM, LIVE_API_KEY_HEADER};
use crate::core::TransportError;
use crate::graphql::{GraphQlRequest, GraphQlResponse};

/// Longest response body kept in a [`TransportError::Status`].
const MAX_ERROR_BODY_LEN: usize = 512;

/// How requests authenticate against an endpoint.
#[derive(Clone, Default)]
pub enum EndpointAuth {
    #[default]
    None,
    /// `Authorization: Bearer <token>`, used by the authoring endpoint.
    Bearer(String),
    /// `sc_apikey: <key>`, used by the live delivery endpoint.
    ApiKey(String),
}

impl std::fmt::Debug for EndpointAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Credentials are never printed
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer(_) => f.write_str("Bearer(***)"),
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}

/// Posts GraphQL documents as JSON to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    auth: EndpointAuth,
}

impl HttpTransport {
    /// Build a transport with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the underlying client cannot be
    /// built (for example when the TLS backend fails to initialise).
    pub fn new(
        endpoint: impl Into<String>,
        auth: EndpointAuth,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pubstatus/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            auth,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    async fn execute(
        &self,
        request: &GraphQlRequest,
    ) -> Result<Option<GraphQlResponse>, TransportError> {
        debug!("POST {} ({} query, {} bytes)", self.endpoint, request.source, request.query.len());

        let mut builder =
            self.client.post(&self.endpoint).json(&json!({ "query": request.query }));

        if let Some(token) = &request.context_token {
            builder = builder.query(&[(CONTEXT_ID_PARAM, token.as_str())]);
        }

        builder = match &self.auth {
            EndpointAuth::None => builder,
            EndpointAuth::Bearer(token) => builder.bearer_auth(token),
            EndpointAuth::ApiKey(key) => builder.header(LIVE_API_KEY_HEADER, key),
        };

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(
                body.char_indices()
                    .nth(MAX_ERROR_BODY_LEN)
                    .map_or(body.len(), |(i, _)| i),
            );
            warn!("{} endpoint returned HTTP {}", request.source, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        if body.is_null() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_value(body)?))
    }
}
