//! Live round trips: fake target, real browser, mock endpoint.

use sst_harness::suite::saml2int::Saml2Int;
use sst_harness::suite::{CaseInfo, ResponseCase, TestCase, TestSuite, Verdict};
use sst_harness::{Dispatcher, HttpBrowser, TargetConfiguration, TestStatus};
use sst_protocol::endpoints::CaptureSlot;
use sst_protocol::{CapturedMessage, SamlBinding};

use crate::common::{init_tracing, settings, start_mock, Delivery, FakeTarget, MINIMAL_RESPONSE};

const INFO: CaseInfo = CaseInfo {
    name: "MinimalRedirectResponse",
    description: "The target sends <Response/> over HTTP-Redirect",
    success_message: "received the minimal Response over HTTP-Redirect",
    failed_message: "did not receive the minimal Response",
};

fn expects_minimal_redirect_response(message: &CapturedMessage) -> Verdict {
    if message.raw_xml == MINIMAL_RESPONSE && message.binding == SamlBinding::HttpRedirect {
        Verdict::ok()
    } else {
        Verdict::error(format!("unexpected capture: {message:?}"))
    }
}

fn minimal_case(sp_initiated: bool) -> TestCase {
    TestCase::Response(ResponseCase {
        info: INFO,
        sp_initiated,
        check: expects_minimal_redirect_response,
    })
}

fn target_config(target: &FakeTarget, password: &str) -> anyhow::Result<TargetConfiguration> {
    let json = serde_json::json!({
        "startPage": target.url("/login").as_str(),
        "idpInitiatedPage": target.url("/init").as_str(),
        "preResponseInteractions": [
            {"type": "form", "selector": "#login", "values": {"user": "alice", "pass": password}}
        ]
    });
    Ok(TargetConfiguration::from_json(&json.to_string())?)
}

/// Login form, then a redirect carrying base64(raw_deflate("<Response/>")).
#[tokio::test]
async fn test_sp_initiated_redirect_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let slot = CaptureSlot::new();
    let mock = start_mock(&slot).await?;
    let target = FakeTarget::start(&mock.url(), Delivery::Redirect).await?;

    let settings = settings();
    let dispatcher = Dispatcher::new(
        target_config(&target, "secret")?,
        HttpBrowser::new(&settings)?,
        slot,
        settings,
    );

    let result = dispatcher.run_case(&minimal_case(true)).await;
    assert_eq!(result.status, TestStatus::Ok, "{}", result.message);
    assert_eq!(result.message, INFO.success_message);

    mock.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_wrong_credentials_yield_critical() -> anyhow::Result<()> {
    init_tracing();
    let slot = CaptureSlot::new();
    let mock = start_mock(&slot).await?;
    let target = FakeTarget::start(&mock.url(), Delivery::Redirect).await?;

    let settings = settings();
    let dispatcher = Dispatcher::new(
        target_config(&target, "wrong")?,
        HttpBrowser::new(&settings)?,
        slot,
        settings,
    );

    let result = dispatcher.run_case(&minimal_case(true)).await;
    assert_eq!(result.status, TestStatus::Critical);
    assert!(
        result
            .message
            .starts_with("Could not retrieve the message that was sent"),
        "{}",
        result.message
    );

    mock.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_idp_initiated_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let slot = CaptureSlot::new();
    let mock = start_mock(&slot).await?;
    let target = FakeTarget::start(&mock.url(), Delivery::Redirect).await?;

    let settings = settings();
    let dispatcher = Dispatcher::new(
        target_config(&target, "unused")?,
        HttpBrowser::new(&settings)?,
        slot,
        settings,
    );

    let result = dispatcher.run_case(&minimal_case(false)).await;
    assert_eq!(result.status, TestStatus::Ok, "{}", result.message);

    mock.stop().await?;
    Ok(())
}

/// The target answers the login with an auto-submitting POST form.
#[tokio::test]
async fn test_saml2int_suite_over_post() -> anyhow::Result<()> {
    init_tracing();
    let slot = CaptureSlot::new();
    let mock = start_mock(&slot).await?;
    let target = FakeTarget::start(&mock.url(), Delivery::Post).await?;

    let settings = settings();
    let dispatcher = Dispatcher::new(
        target_config(&target, "secret")?,
        HttpBrowser::new(&settings)?,
        slot,
        settings,
    );

    let suite = Saml2Int::new();
    let report = dispatcher.run_suite(&suite, None).await;
    assert_eq!(report.len(), suite.test_cases().len());

    let status_of = |name: &str| {
        report
            .results()
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.status)
    };
    for name in [
        "ResponseByPost",
        "ResponseStatusSuccess",
        "ResponseContainsAssertion",
        "ResponseSubjectConfirmationBearer",
        "IdPInitiatedResponse",
        "ConfigInteractionsDefined",
    ] {
        assert_eq!(status_of(name), Some(TestStatus::Ok), "{name}");
    }
    assert_eq!(status_of("ConfigStartPageHTTPS"), Some(TestStatus::Warning));
    assert_eq!(status_of("MetadataAvailable"), Some(TestStatus::Critical));
    assert!(report.has_failures());

    mock.stop().await?;
    Ok(())
}

/// An auto-post form with an empty `SAMLResponse` is not a message.
#[tokio::test]
async fn test_empty_post_message_is_critical() -> anyhow::Result<()> {
    init_tracing();
    let slot = CaptureSlot::new();
    let mock = start_mock(&slot).await?;
    let target = FakeTarget::start(&mock.url(), Delivery::EmptyPost).await?;

    let settings = settings();
    let dispatcher = Dispatcher::new(
        target_config(&target, "secret")?,
        HttpBrowser::new(&settings)?,
        slot,
        settings,
    );

    let suite = Saml2Int::new();
    let case = suite
        .find_case("ResponseByPost")
        .ok_or_else(|| anyhow::anyhow!("ResponseByPost is not in the suite"))?;
    let result = dispatcher.run_case(case).await;
    assert_eq!(result.status, TestStatus::Critical, "{}", result.message);
    assert!(result.message.contains("empty message"), "{}", result.message);

    mock.stop().await?;
    Ok(())
}
