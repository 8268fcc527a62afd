//! CLI error types.

use sst_harness::HarnessError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Harness failure.
    #[error(transparent)]
    Harness(#[from] HarnessError),

    /// The run finished but some test cases failed (with `--fail-on-error`).
    #[error("{0} test case(s) reported ERROR or CRITICAL")]
    TestFailures(usize),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Harness(e) => e.exit_code(),
            Self::TestFailures(_) => 5,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
