//! End-to-end tests for Corpline
//!
//! These tests verify complete lookup workflows from start to finish:
//! a live proxy on an ephemeral port in front of a mock upstream, driven
//! over HTTP exactly as a caller would.

mod lookup_workflow;
