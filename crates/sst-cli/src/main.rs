//! # sst
//!
//! Command-line runner for the SAML 2.0 Web SSO conformance harness.

#![forbid(unsafe_code)]
#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use sst_cli::{
    cli::{Cli, Command},
    commands::{run_list_cases, run_list_suites, run_metadata, run_tests},
    output::error,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Command::ListSuites { output } => run_list_suites(output),
        Command::ListCases { suite, output } => run_list_cases(&suite, output),
        Command::Metadata { suite } => run_metadata(&suite),
        Command::Run(args) => run_tests(args).await,
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
