//! Test cases and test suites.
//!
//! A [`TestCase`] is one of three kinds, each carrying a pure predicate over
//! the artifact it checks:
//!
//! - [`ConfigCase`] - Checks the [`TargetConfiguration`]
//! - [`MetadataCase`] - Checks the target's metadata document
//! - [`ResponseCase`] - Checks the message captured during a live round trip
//!
//! Suites group cases under a stable identifier and are looked up through
//! the [`SuiteRegistry`].

mod registry;
pub mod saml2int;

pub use registry::*;

use sst_protocol::endpoints::mock_sp_metadata;
use sst_protocol::{CapturedMessage, XmlDocument};

use crate::config::TargetConfiguration;
use crate::report::TestStatus;

/// Outcome of a rule predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Outcome category.
    pub status: TestStatus,
    /// Explanation; when absent the case's success or failed message is used.
    pub message: Option<String>,
}

impl Verdict {
    /// Conforms, with the case's success message.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: TestStatus::Ok,
            message: None,
        }
    }

    /// Deviates from a recommendation.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with(TestStatus::Warning, message)
    }

    /// Violates a requirement.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with(TestStatus::Error, message)
    }

    /// Could not be evaluated.
    pub fn critical(message: impl Into<String>) -> Self {
        Self::with(TestStatus::Critical, message)
    }

    /// Fails with `status` and the case's failed message.
    #[must_use]
    pub const fn failed(status: TestStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }

    fn with(status: TestStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }
}

/// Descriptive fields shared by every test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseInfo {
    /// Stable name, unique within its suite.
    pub name: &'static str,
    /// What the case checks.
    pub description: &'static str,
    /// Message reported when the case passes.
    pub success_message: &'static str,
    /// Message reported when the case fails without its own explanation.
    pub failed_message: &'static str,
}

/// Static check over the target configuration.
#[derive(Debug, Clone, Copy)]
pub struct ConfigCase {
    /// Descriptive fields.
    pub info: CaseInfo,
    /// Rule predicate.
    pub check: fn(&TargetConfiguration) -> Verdict,
}

/// Static check over the target's metadata.
///
/// The dispatcher never calls `check` without a document.
#[derive(Debug, Clone, Copy)]
pub struct MetadataCase {
    /// Descriptive fields.
    pub info: CaseInfo,
    /// Rule predicate.
    pub check: fn(&XmlDocument) -> Verdict,
}

/// Live round-trip check over the captured message.
#[derive(Debug, Clone, Copy)]
pub struct ResponseCase {
    /// Descriptive fields.
    pub info: CaseInfo,
    /// Whether the flow starts at the mock SP (true) or at the target (false).
    pub sp_initiated: bool,
    /// Rule predicate.
    pub check: fn(&CapturedMessage) -> Verdict,
}

/// A conformance test case.
#[derive(Debug, Clone, Copy)]
pub enum TestCase {
    /// Configuration check.
    Config(ConfigCase),
    /// Metadata check.
    Metadata(MetadataCase),
    /// Round-trip check.
    Response(ResponseCase),
}

impl TestCase {
    /// Descriptive fields of the case.
    #[must_use]
    pub const fn info(&self) -> &CaseInfo {
        match self {
            Self::Config(case) => &case.info,
            Self::Metadata(case) => &case.info,
            Self::Response(case) => &case.info,
        }
    }

    /// Name of the case.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.info().name
    }

    /// Short label of the case kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Metadata(_) => "metadata",
            Self::Response(_) => "response",
        }
    }
}

/// A named group of test cases.
pub trait TestSuite: Send + Sync {
    /// Stable identifier the suite is registered under.
    fn id(&self) -> &'static str;

    /// One-line description.
    fn description(&self) -> &'static str;

    /// Entity ID the mock endpoint presents to the target.
    fn mock_entity_id(&self) -> &'static str;

    /// URL the mock endpoint is reachable at.
    fn mock_endpoint_url(&self) -> &'static str;

    /// Metadata of the mock endpoint, to be registered at the target.
    fn mock_metadata(&self) -> String {
        mock_sp_metadata(self.mock_entity_id(), self.mock_endpoint_url())
    }

    /// Cases in execution order.
    fn test_cases(&self) -> &[TestCase];

    /// Looks up a case by name (case-insensitive).
    fn find_case(&self, name: &str) -> Option<&TestCase> {
        self.test_cases()
            .iter()
            .find(|case| case.name().eq_ignore_ascii_case(name))
    }
}
