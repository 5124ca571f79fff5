//! Corpline Registry - upstream outline lookup client

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Talks to the government corporate outline service: builds the forwarded
//! query in upstream's expected shape, issues the outbound request, and
//! exposes a provider trait so the web layer can be exercised without a
//! network.

pub mod client;
pub mod errors;
pub mod types;

// Re-export main types
pub use client::{RegistryClient, UPSTREAM_CONTENT_TYPE};
pub use errors::RegistryError;
pub use types::{
    DEFAULT_NUM_OF_ROWS, DEFAULT_PAGE_NO, DEFAULT_RESULT_TYPE, OutlineProvider, OutlineRequest,
};

/// Convenience type alias for Results with RegistryError.
pub type Result<T> = std::result::Result<T, RegistryError>;
