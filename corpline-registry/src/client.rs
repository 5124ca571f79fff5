//! HTTP client forwarding outline lookups to the registry.

use async_trait::async_trait;
use corpline_core::UpstreamConfig;

use crate::errors::RegistryError;
use crate::types::{OutlineProvider, OutlineRequest};

/// Content type header sent on every outbound request.
///
/// Upstream expects this exact value even though lookups are GET requests
/// without a body.
pub const UPSTREAM_CONTENT_TYPE: &str = "application/xml;charset=utf-8";

/// Reqwest-backed registry client.
pub struct RegistryClient {
    pub(crate) base_url: String,
    client: reqwest::Client,
}

impl RegistryClient {
    /// Creates a registry client from the upstream configuration.
    ///
    /// The underlying HTTP client only carries a timeout when one is
    /// configured; the default configuration waits indefinitely.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed, which reqwest only
    /// does when the TLS backend fails to initialize.
    pub fn new(config: &UpstreamConfig) -> Self {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(5));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            base_url: config.base_url.clone(),
            client: builder
                .build()
                .expect("HTTP client creation should not fail"),
        }
    }

    /// Build lookup URL with forwarded query parameters
    pub(crate) fn lookup_url(&self, request: &OutlineRequest) -> String {
        format!("{}?{}", self.base_url, request.query_string())
    }
}

#[async_trait]
impl OutlineProvider for RegistryClient {
    /// Forwards the lookup upstream and returns the raw response body.
    ///
    /// One attempt per call; retry policy belongs to the caller's
    /// deployment, not this client.
    async fn fetch_outline(&self, request: &OutlineRequest) -> Result<String, RegistryError> {
        let url = self.lookup_url(request);
        tracing::debug!("Forwarding outline lookup to {}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, UPSTREAM_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Outline request to {} failed: {}", self.base_url, e);

                if e.is_timeout() {
                    RegistryError::Timeout {
                        url: self.base_url.clone(),
                    }
                } else {
                    RegistryError::RequestFailed {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                "Registry {} returned error status: {}",
                self.base_url,
                status
            );
            return Err(RegistryError::ErrorStatus {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            tracing::warn!(
                "Failed to read response body from {}: {}",
                self.base_url,
                e
            );
            RegistryError::RequestFailed {
                reason: format!("Failed to read response body: {e}"),
            }
        })
    }
}
