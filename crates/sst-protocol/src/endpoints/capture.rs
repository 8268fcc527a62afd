//! Capture endpoint.
//!
//! Stands in for the target's counterparty. Every request is answered with
//! `200 text/html`; recognized messages are decoded and published to the
//! capture slot before the response is sent.

use axum::{
    extract::{rejection::FormRejection, rejection::QueryRejection, Query, State},
    http::Method,
    response::{Html, IntoResponse},
    Form,
};
use serde::Deserialize;

use crate::bindings::{html_escape, BindingCodec};
use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{CaptureOutcome, CapturedMessage, SamlBinding};

use super::state::CaptureState;

/// Binding parameters recognized by the capture endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CaptureParams {
    /// The SAML response.
    #[serde(rename = "SAMLResponse")]
    pub saml_response: Option<String>,

    /// The SAML request.
    #[serde(rename = "SAMLRequest")]
    pub saml_request: Option<String>,

    /// Artifact reference (HTTP-Artifact binding).
    #[serde(rename = "SAMLart")]
    pub saml_art: Option<String>,

    /// Relay state.
    #[serde(rename = "RelayState")]
    pub relay_state: Option<String>,
}

impl CaptureParams {
    fn message(&self) -> Option<&str> {
        self.saml_response
            .as_deref()
            .or(self.saml_request.as_deref())
    }

    fn is_empty(&self) -> bool {
        self.message().is_none() && self.saml_art.is_none()
    }
}

/// GET handler (HTTP-Redirect and HTTP-Artifact bindings).
pub async fn capture_redirect(
    State(state): State<CaptureState>,
    query: Result<Query<CaptureParams>, QueryRejection>,
) -> impl IntoResponse {
    let params = query.map(|Query(p)| p).unwrap_or_else(|rejection| {
        tracing::debug!("unreadable query on capture endpoint: {}", rejection);
        CaptureParams::default()
    });

    let outcome = recognize(&params, SamlBinding::HttpRedirect, BindingCodec::decode_redirect);
    acknowledge(&state, outcome)
}

/// POST handler (HTTP-POST binding).
///
/// Falls back to the query string when the body carries no message.
pub async fn capture_post(
    State(state): State<CaptureState>,
    query: Result<Query<CaptureParams>, QueryRejection>,
    form: Result<Form<CaptureParams>, FormRejection>,
) -> impl IntoResponse {
    let form = form.map(|Form(p)| p).unwrap_or_else(|rejection| {
        tracing::debug!("unreadable form body on capture endpoint: {}", rejection);
        CaptureParams::default()
    });

    let params = if form.is_empty() {
        query.map(|Query(p)| p).unwrap_or_default()
    } else {
        form
    };

    let outcome = recognize(&params, SamlBinding::HttpPost, BindingCodec::decode_post);
    acknowledge(&state, outcome)
}

/// Handler for every other method. Never touches the capture slot.
pub async fn capture_other(method: Method) -> impl IntoResponse {
    tracing::debug!(%method, "ignoring request on capture endpoint");
    Html(ack_page(None))
}

fn recognize(
    params: &CaptureParams,
    binding: SamlBinding,
    decode: fn(&str) -> ProtocolResult<String>,
) -> Option<CaptureOutcome> {
    if let Some(encoded) = params.message() {
        let outcome = match decode_non_empty(encoded, decode) {
            Ok(xml) => CaptureOutcome::Captured(
                CapturedMessage::new(xml, binding).with_relay_state(params.relay_state.clone()),
            ),
            Err(e) => {
                tracing::warn!(%binding, "captured message could not be decoded: {}", e);
                CaptureOutcome::Malformed {
                    binding,
                    error: e.to_string(),
                }
            }
        };
        return Some(outcome);
    }

    if params.saml_art.is_some() {
        tracing::warn!("artifact binding received, which the harness cannot resolve");
        return Some(CaptureOutcome::Unsupported {
            binding: SamlBinding::HttpArtifact,
        });
    }

    tracing::debug!(%binding, "no message parameter on capture endpoint");
    None
}

/// A blank parameter, or one that decodes to blank text, is not a message.
fn decode_non_empty(
    encoded: &str,
    decode: fn(&str) -> ProtocolResult<String>,
) -> ProtocolResult<String> {
    if encoded.trim().is_empty() {
        return Err(ProtocolError::EmptyMessage);
    }
    let xml = decode(encoded)?;
    if xml.trim().is_empty() {
        return Err(ProtocolError::EmptyMessage);
    }
    Ok(xml)
}

fn acknowledge(state: &CaptureState, outcome: Option<CaptureOutcome>) -> Html<String> {
    let page = ack_page(outcome.as_ref());
    if let Some(outcome) = outcome {
        tracing::info!(binding = %outcome.binding(), "message captured");
        state.slot.publish(outcome);
    }
    Html(page)
}

fn ack_page(outcome: Option<&CaptureOutcome>) -> String {
    let body = match outcome {
        Some(CaptureOutcome::Captured(message)) => format!(
            "<p>Received a message over {}.</p>\n    <pre>{}</pre>",
            message.binding,
            html_escape(&message.raw_xml)
        ),
        Some(CaptureOutcome::Unsupported { binding }) => {
            format!("<p>Received a message over {binding}, which is not supported.</p>")
        }
        Some(CaptureOutcome::Malformed { binding, error }) => format!(
            "<p>Received a message over {} that could not be decoded: {}</p>",
            binding,
            html_escape(error)
        ),
        None => "<p>No SAML message was found in this request.</p>".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>SAML Test Harness</title>
</head>
<body>
    {body}
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_param_takes_precedence() {
        let params = CaptureParams {
            saml_response: Some(BindingCodec::encode_post("<Response/>")),
            saml_art: Some("AAQ".to_string()),
            relay_state: Some("rs".to_string()),
            ..CaptureParams::default()
        };

        let outcome = recognize(&params, SamlBinding::HttpPost, BindingCodec::decode_post);
        let expected = CapturedMessage::new("<Response/>", SamlBinding::HttpPost)
            .with_relay_state(Some("rs".to_string()));
        assert_eq!(outcome, Some(CaptureOutcome::Captured(expected)));
    }

    #[test]
    fn artifact_is_unsupported() {
        let params = CaptureParams {
            saml_art: Some("AAQ".to_string()),
            ..CaptureParams::default()
        };
        let outcome = recognize(&params, SamlBinding::HttpRedirect, BindingCodec::decode_redirect);
        assert_eq!(
            outcome,
            Some(CaptureOutcome::Unsupported {
                binding: SamlBinding::HttpArtifact
            })
        );
    }

    #[test]
    fn corrupt_payload_is_malformed() {
        let params = CaptureParams {
            saml_response: Some("!!!".to_string()),
            ..CaptureParams::default()
        };
        let outcome = recognize(&params, SamlBinding::HttpRedirect, BindingCodec::decode_redirect);
        assert!(matches!(outcome, Some(CaptureOutcome::Malformed { .. })));
    }

    #[test]
    fn blank_payload_is_malformed() {
        let cases = [
            (
                String::new(),
                SamlBinding::HttpPost,
                BindingCodec::decode_post as fn(&str) -> ProtocolResult<String>,
            ),
            (" \n".to_string(), SamlBinding::HttpPost, BindingCodec::decode_post),
            (BindingCodec::encode_post("  "), SamlBinding::HttpPost, BindingCodec::decode_post),
            (
                BindingCodec::encode_redirect("").unwrap(),
                SamlBinding::HttpRedirect,
                BindingCodec::decode_redirect,
            ),
        ];

        for (encoded, binding, decode) in cases {
            let params = CaptureParams {
                saml_response: Some(encoded.clone()),
                ..CaptureParams::default()
            };
            assert_eq!(
                recognize(&params, binding, decode),
                Some(CaptureOutcome::Malformed {
                    binding,
                    error: ProtocolError::EmptyMessage.to_string(),
                }),
                "{encoded:?}"
            );
        }
    }

    #[test]
    fn no_params_no_outcome() {
        let outcome = recognize(
            &CaptureParams::default(),
            SamlBinding::HttpRedirect,
            BindingCodec::decode_redirect,
        );
        assert!(outcome.is_none());
    }

    #[test]
    fn ack_page_escapes_captured_xml() {
        let outcome =
            CaptureOutcome::Captured(CapturedMessage::new("<Response/>", SamlBinding::HttpPost));
        let page = ack_page(Some(&outcome));
        assert!(page.contains("&lt;Response/&gt;"));
        assert!(!page.contains("<Response/>"));
    }
}
