//! Test case dispatch.
//!
//! The dispatcher runs one test case at a time. Static cases evaluate the
//! configuration or metadata directly; response cases arm the capture slot,
//! drive the target until it sends its message, and hand whatever the
//! capture endpoint received to the rule predicate.

use sst_protocol::endpoints::CaptureSlot;
use sst_protocol::{CaptureOutcome, ProtocolError};

use crate::config::{HarnessSettings, TargetConfiguration};
use crate::error::{HarnessError, InteractionError};
use crate::interaction::{HaltReason, InteractionEngine, WebClient};
use crate::report::{Report, TestResult, TestStatus};
use crate::suite::{ResponseCase, TestCase, TestSuite, Verdict};

const NO_METADATA: &str =
    "The test case could not be performed because there was no metadata available";
const NO_START_PAGE: &str =
    "The test case could not be performed because no start page is configured";

/// Runs test cases against one target.
pub struct Dispatcher<C> {
    target: TargetConfiguration,
    client: C,
    slot: CaptureSlot,
    settings: HarnessSettings,
}

impl<C: WebClient> Dispatcher<C> {
    /// Creates a dispatcher.
    ///
    /// `slot` must be the slot the capture endpoint publishes into.
    pub const fn new(
        target: TargetConfiguration,
        client: C,
        slot: CaptureSlot,
        settings: HarnessSettings,
    ) -> Self {
        Self {
            target,
            client,
            slot,
            settings,
        }
    }

    /// The target under test.
    pub const fn target(&self) -> &TargetConfiguration {
        &self.target
    }

    /// Runs the cases of `suite` in order, or only the one named `filter`.
    ///
    /// An unknown case name is logged and yields an empty report.
    pub async fn run_suite(&self, suite: &dyn TestSuite, filter: Option<&str>) -> Report {
        let cases: Vec<&TestCase> = match filter {
            Some(name) => match suite.find_case(name) {
                Some(case) => vec![case],
                None => {
                    tracing::warn!(suite = suite.id(), case = name, "unknown test case, skipping");
                    Vec::new()
                }
            },
            None => suite.test_cases().iter().collect(),
        };

        tracing::info!(suite = suite.id(), cases = cases.len(), "starting test run");

        let mut report = Report::new();
        for case in cases {
            report.push(self.run_case(case).await);
        }

        let summary = report.summary();
        tracing::info!(
            suite = suite.id(),
            ok = summary.ok,
            warning = summary.warning,
            error = summary.error,
            critical = summary.critical,
            "test run finished"
        );
        report
    }

    /// Runs one test case. Always produces exactly one result.
    pub async fn run_case(&self, case: &TestCase) -> TestResult {
        let info = case.info();
        tracing::info!(case = info.name, kind = case.kind(), "running test case");

        let verdict = match case {
            TestCase::Config(config) => (config.check)(&self.target),
            TestCase::Metadata(metadata) => match self.target.metadata() {
                Some(doc) => (metadata.check)(doc),
                None => Verdict::critical(NO_METADATA),
            },
            TestCase::Response(response) => self.round_trip(response).await,
        };

        let message = verdict.message.unwrap_or_else(|| {
            if verdict.status == TestStatus::Ok {
                info.success_message.to_string()
            } else {
                info.failed_message.to_string()
            }
        });

        match verdict.status {
            TestStatus::Ok => tracing::info!(case = info.name, "OK"),
            TestStatus::Warning | TestStatus::Error => {
                tracing::warn!(case = info.name, status = %verdict.status, "{}", message);
            }
            TestStatus::Critical => tracing::error!(case = info.name, "{}", message),
        }

        TestResult::new(info.name, info.description, verdict.status, message)
    }

    async fn round_trip(&self, case: &ResponseCase) -> Verdict {
        let start = if case.sp_initiated {
            self.target.start_url()
        } else {
            self.target.idp_initiated_url()
        };
        let Some(start) = start else {
            return Verdict::critical(NO_START_PAGE);
        };

        let ticket = self.slot.arm();
        tracing::debug!(round = ticket.round(), %start, sp_initiated = case.sp_initiated, "round trip started");

        let navigation_error = if case.sp_initiated {
            let replay = InteractionEngine::replay_until(
                &self.client,
                start,
                self.target.interactions(),
                || self.slot.has_outcome(),
            );
            match replay.await {
                Ok(replay) => {
                    tracing::debug!(
                        steps = replay.steps_completed,
                        url = %replay.page.url,
                        "interaction replay finished"
                    );
                    match replay.halt {
                        HaltReason::Failed { error, .. } => Some(error),
                        HaltReason::Completed
                        | HaltReason::NonInteractivePage { .. }
                        | HaltReason::MessageSent { .. } => None,
                    }
                }
                Err(e) => Some(e),
            }
        } else {
            self.client.fetch(start).await.err()
        };

        match ticket.wait(self.settings.capture_grace).await {
            Some(CaptureOutcome::Captured(message)) => {
                tracing::debug!(binding = %message.binding, "captured message");
                tracing::trace!("{}", message.raw_xml);
                (case.check)(&message)
            }
            Some(CaptureOutcome::Unsupported { binding }) => Verdict::critical(format!(
                "The message could not be evaluated: {}",
                HarnessError::Protocol(ProtocolError::UnsupportedBinding(binding.to_string()))
            )),
            Some(CaptureOutcome::Malformed { binding, error }) => {
                Verdict::critical(HarnessError::MalformedCapture { binding, error }.to_string())
            }
            None => Verdict::critical(format!(
                "Could not retrieve the message that was sent: {}",
                absence_cause(navigation_error)
            )),
        }
    }
}

fn absence_cause(navigation_error: Option<InteractionError>) -> HarnessError {
    navigation_error.map_or(HarnessError::CaptureAbsent, HarnessError::Interaction)
}
