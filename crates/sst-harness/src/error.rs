//! Harness error types.

use sst_protocol::{ProtocolError, SamlBinding};
use thiserror::Error;

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Failure while replaying a scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    /// The selector or element was not found on the current page.
    #[error("element not found: {0}")]
    NotFound(String),

    /// The selector itself could not be parsed.
    #[error("invalid selector '{0}'")]
    InvalidSelector(String),

    /// Network or HTTP failure while fetching a page.
    #[error("transport error: {0}")]
    Transport(String),

    /// A URL on the page or in the configuration was malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for InteractionError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<url::ParseError> for InteractionError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Harness error type.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Target configuration missing, unreadable or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Scripted interaction failed.
    #[error("interaction failed: {0}")]
    Interaction(#[from] InteractionError),

    /// The round trip finished but nothing reached the capture endpoint.
    #[error("no message was received by the mock endpoint")]
    CaptureAbsent,

    /// A message arrived but its payload could not be decoded.
    #[error("received a malformed message over {binding}: {error}")]
    MalformedCapture {
        /// Binding the message arrived on.
        binding: SamlBinding,
        /// Decode failure.
        error: String,
    },

    /// Protocol-level failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Unknown test suite identifier.
    #[error("unknown test suite: {0}")]
    UnknownSuite(String),

    /// Unknown test case name.
    #[error("unknown test case '{case}' in suite {suite}")]
    UnknownTestCase {
        /// Suite identifier.
        suite: String,
        /// Requested case name.
        case: String,
    },

    /// The mock endpoint could not bind its listener.
    #[error("could not bind mock endpoint on {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The mock endpoint failed while serving or stopping.
    #[error("mock endpoint error: {0}")]
    Endpoint(String),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Process exit code for this failure category.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Bind { .. } => 3,
            Self::UnknownSuite(_) | Self::UnknownTestCase { .. } => 4,
            _ => 1,
        }
    }

    /// Returns true if this failure aborts the whole run rather than one test case.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Bind { .. } | Self::UnknownSuite(_) | Self::UnknownTestCase { .. }
        )
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("malformed configuration: {err}"))
    }
}
