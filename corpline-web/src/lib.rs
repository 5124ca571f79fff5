//! Corpline Web - Corporate Outline Proxy Server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Single-endpoint HTTP proxy in front of the corporate outline registry.
//! Exposes `GET /corp`, forwards lookups upstream and answers in the
//! caller's requested format.

pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, build_router, run_server};
