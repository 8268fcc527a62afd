//! Test runs.

use std::time::Duration;

use sst_harness::{
    Dispatcher, HarnessError, HarnessSettings, HttpBrowser, MockServer, SuiteRegistry,
    TargetConfiguration,
};
use sst_protocol::endpoints::CaptureSlot;

use crate::cli::RunArgs;
use crate::output::output_report;
use crate::CliError;

/// Runs a test suite against the configured target and prints the report.
///
/// Everything that can abort the run is checked before the mock endpoint is
/// bound. Once it is, the endpoint is stopped whatever the outcome.
pub async fn run_tests(args: RunArgs) -> crate::CliResult<()> {
    let mut settings = HarnessSettings::from_env();
    if args.insecure {
        settings.insecure = true;
    }
    if let Some(ms) = args.capture_grace_ms {
        settings.capture_grace = Duration::from_millis(ms);
    }

    let suite = SuiteRegistry::builtin().get(&args.suite)?;
    if let Some(case) = args.case.as_deref() {
        if suite.find_case(case).is_none() {
            return Err(HarnessError::UnknownTestCase {
                suite: suite.id().to_string(),
                case: case.to_string(),
            }
            .into());
        }
    }

    let target = TargetConfiguration::load(&args.config)?;
    let client = HttpBrowser::new(&settings).map_err(HarnessError::from)?;

    let slot = CaptureSlot::new();
    let server = MockServer::start_for(suite.as_ref(), slot.clone()).await?;
    tracing::info!(suite = suite.id(), endpoint = %server.url(), "mock endpoint ready");

    let dispatcher = Dispatcher::new(target, client, slot, settings);
    let report = dispatcher.run_suite(suite.as_ref(), args.case.as_deref()).await;

    if let Err(e) = server.stop().await {
        tracing::warn!("failed to stop mock endpoint: {}", e);
    }

    output_report(&report, args.output)?;

    if args.fail_on_error && report.has_failures() {
        return Err(CliError::TestFailures(report.failure_count()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::output::OutputFormat;

    fn args(suite: &str, case: Option<&str>, config: &str) -> RunArgs {
        RunArgs {
            suite: suite.to_string(),
            case: case.map(String::from),
            config: PathBuf::from(config),
            insecure: false,
            output: OutputFormat::Json,
            capture_grace_ms: Some(10),
            fail_on_error: false,
        }
    }

    #[tokio::test]
    async fn unknown_suite_is_rejected_before_loading_config() {
        let err = run_tests(args("nope", None, "/nonexistent/target.json"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn unknown_case_is_rejected() {
        let err = run_tests(args("saml2int", Some("NoSuchCase"), "/nonexistent/target.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Harness(HarnessError::UnknownTestCase { .. })));
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn unreadable_config_is_a_config_error() {
        let err = run_tests(args("saml2int", None, "/nonexistent/target.json"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
