//! Corpline Core - corporate outline lookup domain logic
//!
//! This crate provides the building blocks of the lookup proxy: configuration
//! management, upstream payload ingestion, record filtering, and response
//! envelope assembly for both output formats.

pub mod config;
pub mod envelope;
pub mod payload;
pub mod record;
pub mod xml;

// Re-export main types for convenient access
pub use config::{CorplineConfig, DEFAULT_UPSTREAM_URL, ServerConfig, UpstreamConfig};
pub use payload::{PayloadError, ResultType, parse_records};
pub use record::RecordFilter;
pub use xml::XmlError;
