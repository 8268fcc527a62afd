//! End-to-end integration tests.
//!
//! These tests run the harness against a fake target and the mock endpoint,
//! both served on loopback listeners.

mod capture_flow;
mod common;
mod mock_endpoint;
