//! Integration tests for Corpline
//!
//! These tests verify the integration between different components of the
//! system: the registry client against a mock upstream, the parse/filter/
//! envelope pipeline over real HTTP bodies, and the outbound wire contract.

#[path = "integration/lookup_pipeline.rs"]
mod lookup_pipeline;

#[path = "integration/upstream_contract.rs"]
mod upstream_contract;
