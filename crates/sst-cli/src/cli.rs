//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// SAML 2.0 Web SSO conformance test harness.
#[derive(Debug, Parser)]
#[command(name = "sst")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose (debug) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the available test suites.
    ListSuites {
        /// Output format.
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// List the test cases of a suite.
    ListCases {
        /// Test suite identifier.
        #[arg(short, long)]
        suite: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Print the mock endpoint's metadata for a suite.
    Metadata {
        /// Test suite identifier.
        #[arg(short, long)]
        suite: String,
    },

    /// Run a test suite against a target.
    Run(RunArgs),
}

/// Arguments of the `run` command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Test suite identifier.
    #[arg(short, long)]
    pub suite: String,

    /// Run only this test case.
    #[arg(long)]
    pub case: Option<String>,

    /// Target configuration file (JSON).
    #[arg(short, long, env = "SST_TARGET_CONFIG")]
    pub config: PathBuf,

    /// Accept invalid TLS certificates from the target.
    #[arg(long)]
    pub insecure: bool,

    /// Report format.
    #[arg(short, long, value_enum, default_value = "json")]
    pub output: OutputFormat,

    /// How long to wait for the target's message after the flow completes.
    #[arg(long, value_name = "MS")]
    pub capture_grace_ms: Option<u64>,

    /// Exit with status 5 if any test case reports ERROR or CRITICAL.
    #[arg(long)]
    pub fail_on_error: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run() {
        let cli = Cli::try_parse_from([
            "sst",
            "run",
            "--suite",
            "saml2int",
            "--config",
            "target.json",
            "--case",
            "MetadataHTTPS",
            "--insecure",
            "--output",
            "table",
            "--capture-grace-ms",
            "500",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.suite, "saml2int");
        assert_eq!(args.case.as_deref(), Some("MetadataHTTPS"));
        assert_eq!(args.config, PathBuf::from("target.json"));
        assert!(args.insecure);
        assert_eq!(args.output, OutputFormat::Table);
        assert_eq!(args.capture_grace_ms, Some(500));
        assert!(!args.fail_on_error);
    }

    #[test]
    fn run_defaults_to_json() {
        let cli = Cli::try_parse_from(["sst", "run", "-s", "saml2int", "-c", "t.json"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.output, OutputFormat::Json);
        assert!(args.case.is_none());
    }

    #[test]
    fn list_cases_requires_suite() {
        assert!(Cli::try_parse_from(["sst", "list-cases"]).is_err());
        assert!(Cli::try_parse_from(["sst", "list-cases", "--suite", "saml2int"]).is_ok());
    }
}
