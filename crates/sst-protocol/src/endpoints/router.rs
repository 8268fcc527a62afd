//! Capture router configuration.
//!
//! Provides the Axum router for the mock counterparty.

use axum::{routing::get, Router};

use super::capture::{capture_other, capture_post, capture_redirect};
use super::state::CaptureState;

/// Creates the capture router mounted at `path`.
///
/// # Endpoints
///
/// | Method   | Path     | Handler            | Description                      |
/// |----------|----------|--------------------|----------------------------------|
/// | GET      | `path`   | `capture_redirect` | HTTP-Redirect / HTTP-Artifact    |
/// | POST     | `path`   | `capture_post`     | HTTP-POST                        |
/// | other    | `path`   | `capture_other`    | Acknowledged, nothing captured   |
///
/// # Usage
///
/// ```rust,ignore
/// use sst_protocol::endpoints::{capture_router, CaptureSlot, CaptureState};
///
/// let app = capture_router("/sso").with_state(CaptureState::new(CaptureSlot::new()));
/// ```
pub fn capture_router(path: &str) -> Router<CaptureState> {
    Router::new().route(
        path,
        get(capture_redirect)
            .post(capture_post)
            .fallback(capture_other),
    )
}
