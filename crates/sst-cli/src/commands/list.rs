//! Suite and test case listings.

use serde::Serialize;
use sst_harness::suite::TestSuite;
use sst_harness::{SuiteRegistry, TestCase};
use tabled::Tabled;

use crate::output::{output, OutputFormat};

/// Suite representation for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SuiteDisplay {
    /// Suite identifier.
    #[tabled(rename = "Suite")]
    pub id: String,
    /// Suite description.
    #[tabled(rename = "Description")]
    pub description: String,
    /// Number of test cases.
    #[tabled(rename = "Cases")]
    pub cases: usize,
}

impl SuiteDisplay {
    fn from_suite(suite: &dyn TestSuite) -> Self {
        Self {
            id: suite.id().to_string(),
            description: suite.description().to_string(),
            cases: suite.test_cases().len(),
        }
    }
}

/// Test case representation for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct CaseDisplay {
    /// Test case name.
    #[tabled(rename = "Test Case")]
    pub name: String,
    /// Test case kind.
    #[tabled(rename = "Kind")]
    pub kind: String,
    /// What the case checks.
    #[tabled(rename = "Description")]
    pub description: String,
}

impl From<&TestCase> for CaseDisplay {
    fn from(case: &TestCase) -> Self {
        Self {
            name: case.name().to_string(),
            kind: case.kind().to_string(),
            description: case.info().description.to_string(),
        }
    }
}

/// Lists the built-in test suites.
pub fn run_list_suites(format: OutputFormat) -> crate::CliResult<()> {
    let suites: Vec<SuiteDisplay> = SuiteRegistry::builtin()
        .list()
        .iter()
        .map(|suite| SuiteDisplay::from_suite(suite.as_ref()))
        .collect();
    output(&suites, format)
}

/// Lists the test cases of `suite`.
pub fn run_list_cases(suite: &str, format: OutputFormat) -> crate::CliResult<()> {
    let suite = SuiteRegistry::builtin().get(suite)?;
    let cases: Vec<CaseDisplay> = suite.test_cases().iter().map(CaseDisplay::from).collect();
    output(&cases, format)
}
