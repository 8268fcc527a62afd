//! # sst-harness
//!
//! Orchestration for the SAML 2.0 Web SSO conformance harness.
//!
//! This crate drives a target Identity Provider through a login flow and
//! evaluates what comes back:
//!
//! - **Target configuration** - Where the flow starts, the target's metadata and the scripted login steps
//! - **Interaction engine** - Replays the scripted login steps against the target's web UI
//! - **Test suites** - Named conformance rules, grouped per profile
//! - **Dispatcher** - Runs one test case at a time, coordinating the capture endpoint
//! - **Report** - Collects results in execution order
//!
//! ## Usage
//!
//! ```ignore
//! use sst_harness::{Dispatcher, HarnessSettings, HttpBrowser, MockServer, SuiteRegistry, TargetConfiguration};
//! use sst_protocol::endpoints::CaptureSlot;
//!
//! let settings = HarnessSettings::from_env();
//! let target = TargetConfiguration::load("target.json")?;
//! let suite = SuiteRegistry::builtin().get("saml2int")?;
//!
//! let slot = CaptureSlot::new();
//! let server = MockServer::start_for(suite.as_ref(), slot.clone()).await?;
//! let dispatcher = Dispatcher::new(target, HttpBrowser::new(&settings)?, slot, settings);
//! let report = dispatcher.run_suite(suite.as_ref(), None).await;
//! server.stop().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod interaction;
pub mod mock;
pub mod report;
pub mod suite;

pub use config::{HarnessSettings, TargetConfiguration};
pub use dispatcher::Dispatcher;
pub use error::{HarnessError, HarnessResult, InteractionError};
pub use interaction::{HttpBrowser, Interaction, InteractionEngine, Page, WebClient};
pub use mock::MockServer;
pub use report::{Report, TestResult, TestStatus};
pub use suite::{SuiteRegistry, TestCase, TestSuite, Verdict};
