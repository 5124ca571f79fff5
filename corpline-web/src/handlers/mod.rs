//! HTTP request handlers organized by functionality

pub mod corp;

// Re-export handler functions
pub use corp::{CorpQuery, LOOKUP_FAILED_BODY, corp_lookup};
