//! Centralized configuration for Corpline.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Default upstream endpoint for corporate outline lookups.
pub const DEFAULT_UPSTREAM_URL: &str =
    "http://apis.data.go.kr/1160100/service/GetCorpBasicInfoService_V2/getCorpOutline_V2";

/// Central configuration for all Corpline components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct CorplineConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface the proxy binds to
    pub host: String,
    /// Port the proxy binds to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Upstream registry communication configuration.
///
/// Controls where outline lookups are forwarded and how the outbound
/// HTTP client is built.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the corporate outline service
    pub base_url: String,
    /// User agent for outbound requests
    pub user_agent: &'static str,
    /// Outbound request timeout (None = wait indefinitely)
    ///
    /// No timeout is applied unless one is set here, via
    /// `CORPLINE_UPSTREAM_TIMEOUT` or via `--timeout-secs`.
    pub request_timeout: Option<Duration>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            user_agent: "corpline/0.1.0",
            request_timeout: None, // No timeout by default
        }
    }
}

impl CorplineConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Server configuration overrides
        if let Ok(host) = std::env::var("CORPLINE_HOST") {
            if !host.is_empty() {
                config.server.host = host;
            }
        }

        if let Ok(port) = std::env::var("CORPLINE_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.server.port = port;
            }
        }

        // Upstream configuration overrides
        if let Ok(url) = std::env::var("CORPLINE_UPSTREAM_URL") {
            if !url.is_empty() {
                config.upstream.base_url = url;
            }
        }

        if let Ok(timeout) = std::env::var("CORPLINE_UPSTREAM_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.upstream.request_timeout = Some(Duration::from_secs(seconds));
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    ///
    /// Binds to an ephemeral port and fails fast on a dead upstream.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            upstream: UpstreamConfig {
                request_timeout: Some(Duration::from_secs(5)),
                ..Default::default()
            },
        }
    }
}
