//! Mock endpoint behaviour over real HTTP.

use std::time::Duration;

use sst_protocol::endpoints::CaptureSlot;
use sst_protocol::{BindingCodec, CaptureOutcome, CapturedMessage, SamlBinding};

use crate::common::{init_tracing, start_mock};

#[tokio::test]
async fn test_unrecognized_method_returns_ok_without_capture() -> anyhow::Result<()> {
    init_tracing();
    let slot = CaptureSlot::new();
    let mock = start_mock(&slot).await?;
    let client = reqwest::Client::new();

    let ticket = slot.arm();
    let response = client.put(mock.url()).body("SAMLResponse=abc").send().await?;
    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");

    let response = client.get(mock.url()).send().await?;
    assert_eq!(response.status(), 200);

    assert!(slot.peek().is_none());
    assert!(ticket.wait(Duration::from_millis(10)).await.is_none());

    mock.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_message_without_round_trip_is_dropped() -> anyhow::Result<()> {
    init_tracing();
    let slot = CaptureSlot::new();
    let mock = start_mock(&slot).await?;
    let param = BindingCodec::encode_redirect("<Response/>")?;

    let response = reqwest::Client::new()
        .get(mock.url())
        .query(&[("SAMLResponse", param.as_str())])
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let ticket = slot.arm();
    assert!(ticket.wait(Duration::from_millis(10)).await.is_none());

    mock.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_redirect_capture_keeps_relay_state() -> anyhow::Result<()> {
    init_tracing();
    let slot = CaptureSlot::new();
    let mock = start_mock(&slot).await?;
    let param = BindingCodec::encode_redirect("<Response ID=\"_1\"/>")?;

    let ticket = slot.arm();
    let response = reqwest::Client::new()
        .get(mock.url())
        .query(&[("SAMLResponse", param.as_str()), ("RelayState", "state 1")])
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let expected = CapturedMessage::new("<Response ID=\"_1\"/>", SamlBinding::HttpRedirect)
        .with_relay_state(Some("state 1".to_string()));
    assert_eq!(
        ticket.wait(Duration::from_secs(1)).await,
        Some(CaptureOutcome::Captured(expected))
    );

    mock.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_artifact_and_malformed_payloads() -> anyhow::Result<()> {
    init_tracing();
    let slot = CaptureSlot::new();
    let mock = start_mock(&slot).await?;
    let client = reqwest::Client::new();

    let ticket = slot.arm();
    client
        .get(mock.url())
        .query(&[("SAMLart", "AAQAAMh48/1oXIM+sDo7Dh2qMp1HM4IF5DaRNmDj6RdUmllwn9jJHyEgIi8=")])
        .send()
        .await?;
    assert_eq!(
        ticket.wait(Duration::from_secs(1)).await,
        Some(CaptureOutcome::Unsupported {
            binding: SamlBinding::HttpArtifact
        })
    );

    let ticket = slot.arm();
    client
        .get(mock.url())
        .query(&[("SAMLResponse", "not base64 at all!")])
        .send()
        .await?;
    let outcome = ticket.wait(Duration::from_secs(1)).await;
    assert!(
        matches!(
            outcome,
            Some(CaptureOutcome::Malformed {
                binding: SamlBinding::HttpRedirect,
                ..
            })
        ),
        "{outcome:?}"
    );

    mock.stop().await?;
    Ok(())
}
