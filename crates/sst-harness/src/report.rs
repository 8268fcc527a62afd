//! Test results and the run report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome category of a test case.
///
/// The variants are categories, not a severity scale: `Critical` says the
/// case could not be evaluated, not that the target failed worse than an
/// `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    /// The target conforms.
    Ok,
    /// The target deviates from a recommendation.
    Warning,
    /// The target violates a requirement.
    Error,
    /// The test could not be evaluated.
    Critical,
}

impl TestStatus {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Returns true for anything other than `Ok`.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !matches!(self, Self::Ok)
    }

    /// Returns true for `Error` and `Critical`, the outcomes that fail a run
    /// under `--fail-on-error`.
    #[must_use]
    pub const fn fails_run(&self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test case name.
    pub name: String,
    /// What the test case checks.
    pub description: String,
    /// Outcome.
    pub status: TestStatus,
    /// Human-readable explanation.
    pub message: String,
}

impl TestResult {
    /// Creates a result.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        status: TestStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status,
            message: message.into(),
        }
    }
}

/// Count of results per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Results with status `OK`.
    pub ok: usize,
    /// Results with status `WARNING`.
    pub warning: usize,
    /// Results with status `ERROR`.
    pub error: usize,
    /// Results with status `CRITICAL`.
    pub critical: usize,
}

impl Summary {
    /// Total number of results.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.ok + self.warning + self.error + self.critical
    }
}

/// Results of a run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    results: Vec<TestResult>,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Results in execution order.
    #[must_use]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no case was run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Counts results per status.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.results
            .iter()
            .fold(Summary::default(), |mut summary, result| {
                match result.status {
                    TestStatus::Ok => summary.ok += 1,
                    TestStatus::Warning => summary.warning += 1,
                    TestStatus::Error => summary.error += 1,
                    TestStatus::Critical => summary.critical += 1,
                }
                summary
            })
    }

    /// Returns true if any result has status `ERROR` or `CRITICAL`.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.status.fails_run())
    }

    /// Number of results with status `ERROR` or `CRITICAL`.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.fails_run()).count()
    }

    /// Renders the report as a pretty-printed JSON array.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl IntoIterator for Report {
    type Item = TestResult;
    type IntoIter = std::vec::IntoIter<TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
