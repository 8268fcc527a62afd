//! Common test utilities and fixtures.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use sst_harness::{HarnessSettings, MockServer};
use sst_protocol::bindings::{HttpPostBinding, HttpRedirectBinding, MessageKind};
use sst_protocol::endpoints::CaptureSlot;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Minimal message the fake target sends after a successful login.
pub const MINIMAL_RESPONSE: &str = "<Response/>";

/// A full success Response, as a conforming IdP would send it.
pub const SUCCESS_RESPONSE: &str = r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="_r1" Version="2.0">
  <samlp:Status><samlp:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Success"/></samlp:Status>
  <saml:Assertion ID="_a1" Version="2.0">
    <saml:Subject>
      <saml:NameID>alice</saml:NameID>
      <saml:SubjectConfirmation Method="urn:oasis:names:tc:SAML:2.0:cm:bearer"/>
    </saml:Subject>
  </saml:Assertion>
</samlp:Response>"#;

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <h1>Sign in</h1>
  <form id="login" method="post">
    <input type="text" name="user"/>
    <input type="password" name="pass"/>
    <input type="hidden" name="flow" value="sso"/>
    <input type="submit" name="action" value="Sign in"/>
  </form>
  <a id="help" href="/help">Forgot password?</a>
</body>
</html>"#;

/// Initializes tracing for tests; safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("sst_harness=debug,sst_protocol=debug")
        .with_test_writer()
        .try_init();
}

/// Harness settings with a short capture grace period.
pub fn settings() -> HarnessSettings {
    HarnessSettings::for_testing()
}

/// How the fake target delivers its message to the capture endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Redirect with the minimal message in `SAMLResponse`.
    Redirect,
    /// Auto-submitting HTML form carrying a full success Response.
    Post,
    /// Auto-submitting HTML form whose `SAMLResponse` field is empty.
    EmptyPost,
}

#[derive(Clone)]
struct TargetState {
    capture_url: Arc<str>,
    delivery: Delivery,
}

/// A fake Identity Provider with a login form.
///
/// After a login as `alice` / `secret` it sends its message to the capture
/// endpoint; any other credentials get the login page again. `GET /init`
/// sends an unsolicited message without a login.
pub struct FakeTarget {
    addr: SocketAddr,
    _shutdown_tx: oneshot::Sender<()>,
}

impl FakeTarget {
    /// Starts the target; it sends its messages to `capture_url`.
    pub async fn start(capture_url: &str, delivery: Delivery) -> anyhow::Result<Self> {
        let state = TargetState {
            capture_url: Arc::from(capture_url),
            delivery,
        };
        let app = Router::new()
            .route("/login", get(login_page).post(login))
            .route("/init", get(unsolicited))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (_shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                tracing::error!("Fake target error: {}", e);
            }
        });

        Ok(Self { addr, _shutdown_tx })
    }

    /// Absolute URL of `path` on the target.
    pub fn url(&self, path: &str) -> url::Url {
        url::Url::parse(&format!("http://{}{}", self.addr, path))
            .expect("loopback URL is valid")
    }
}

async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

async fn login(
    State(state): State<TargetState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let valid = fields.get("user").map(String::as_str) == Some("alice")
        && fields.get("pass").map(String::as_str) == Some("secret")
        && fields.get("flow").map(String::as_str) == Some("sso");

    if valid {
        deliver(&state)
    } else {
        Html(LOGIN_PAGE).into_response()
    }
}

async fn unsolicited(State(state): State<TargetState>) -> Response {
    deliver(&state)
}

fn deliver(state: &TargetState) -> Response {
    match state.delivery {
        Delivery::Redirect => {
            match HttpRedirectBinding::encode_url(
                MINIMAL_RESPONSE,
                &state.capture_url,
                None,
                MessageKind::Response,
            ) {
                Ok(location) => Redirect::to(&location).into_response(),
                Err(e) => (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    e.to_string(),
                )
                    .into_response(),
            }
        }
        Delivery::Post => Html(HttpPostBinding::encode_form(
            SUCCESS_RESPONSE,
            &state.capture_url,
            Some("relay-123"),
            MessageKind::Response,
        ))
        .into_response(),
        Delivery::EmptyPost => Html(HttpPostBinding::encode_form(
            "",
            &state.capture_url,
            None,
            MessageKind::Response,
        ))
        .into_response(),
    }
}

/// Starts the mock endpoint on an ephemeral loopback port.
pub async fn start_mock(slot: &CaptureSlot) -> anyhow::Result<MockServer> {
    Ok(MockServer::start("127.0.0.1:0", "/sso", slot.clone()).await?)
}
