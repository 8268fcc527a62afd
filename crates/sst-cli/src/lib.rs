//! # sst-cli
//!
//! Command-line runner for the SAML 2.0 Web SSO conformance harness.
//!
//! This crate provides:
//! - Listing of the built-in test suites and their test cases
//! - Output of the mock endpoint's metadata, for registration at the target
//! - Test runs against a target, reported as JSON or as a table

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::future_not_send)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
