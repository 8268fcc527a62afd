//! HTTP-POST Binding implementation.
//!
//! Implements the SAML 2.0 HTTP-POST binding for sending SAML messages
//! via HTML form POST.

use crate::types::params;

use super::{BindingCodec, MessageKind};

/// HTTP-POST binding encoder.
pub struct HttpPostBinding;

impl HttpPostBinding {
    /// Encodes a SAML message for HTTP-POST binding.
    ///
    /// Returns an HTML form that will auto-submit to the destination.
    #[must_use]
    pub fn encode_form(
        xml: &str,
        destination: &str,
        relay_state: Option<&str>,
        kind: MessageKind,
    ) -> String {
        let encoded = BindingCodec::encode_post(xml);

        let relay_state_input = relay_state
            .map(|rs| {
                format!(
                    r#"<input type="hidden" name="{}" value="{}"/>"#,
                    params::RELAY_STATE,
                    html_escape(rs)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>SAML POST Binding</title>
</head>
<body onload="document.forms[0].submit()">
    <form method="post" action="{}">
        <input type="hidden" name="{}" value="{}"/>
        {}
        <noscript>
            <input type="submit" value="Continue"/>
        </noscript>
    </form>
</body>
</html>"#,
            html_escape(destination),
            kind.param(),
            encoded,
            relay_state_input
        )
    }
}

/// Escapes HTML special characters.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden_value<'a>(html: &'a str, name: &str) -> &'a str {
        let marker = format!("name=\"{name}\" value=\"");
        let start = html.find(&marker).unwrap() + marker.len();
        let end = html[start..].find('"').unwrap();
        &html[start..start + end]
    }

    #[test]
    fn form_carries_encoded_response() {
        let xml = r#"<samlp:Response>test</samlp:Response>"#;
        let html = HttpPostBinding::encode_form(
            xml,
            "https://sp.example.com/acs",
            Some("state123"),
            MessageKind::Response,
        );

        assert!(html.contains(r#"action="https://sp.example.com/acs""#));
        assert_eq!(hidden_value(&html, "RelayState"), "state123");

        let encoded = hidden_value(&html, "SAMLResponse");
        assert_eq!(BindingCodec::decode_post(encoded).unwrap(), xml);
    }

    #[test]
    fn form_without_relay_state() {
        let html = HttpPostBinding::encode_form(
            "<AuthnRequest/>",
            "https://idp.example.com/sso",
            None,
            MessageKind::Request,
        );
        assert!(html.contains("SAMLRequest"));
        assert!(!html.contains("RelayState"));
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(html_escape("it's"), "it&#x27;s");
    }
}
