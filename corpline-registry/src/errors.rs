//! Error types for upstream registry communication.

use thiserror::Error;

/// Errors that can occur while talking to the outline registry.
///
/// All variants describe transport-level failures; malformed payloads are
/// diagnosed downstream once the body format is known.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Request could not be sent or the connection was lost mid-flight.
    #[error("Upstream request failed: {reason}")]
    RequestFailed {
        /// The reason for the transport failure
        reason: String,
    },

    /// Request exceeded the configured timeout.
    #[error("Upstream request timed out: {url}")]
    Timeout {
        /// The endpoint that timed out
        url: String,
    },

    /// Upstream answered with a non-success status code.
    #[error("Upstream returned HTTP {status}")]
    ErrorStatus {
        /// The status code upstream returned
        status: u16,
    },
}
