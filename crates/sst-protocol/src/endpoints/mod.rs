//! Capture endpoint handlers.
//!
//! This module provides the Axum HTTP handlers of the mock counterparty:
//!
//! - **Capture Endpoint** - Intercepts the message the target sends
//! - **Capture Slot** - One-shot handoff between the endpoint and the driver
//! - **Mock Metadata** - SP metadata describing the endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use sst_protocol::endpoints::{capture_router, CaptureSlot, CaptureState};
//!
//! let slot = CaptureSlot::new();
//! let app = capture_router("/sso").with_state(CaptureState::new(slot.clone()));
//!
//! let ticket = slot.arm();
//! // ... drive the target ...
//! let outcome = ticket.wait(grace).await;
//! ```

mod capture;
mod metadata;
mod router;
mod state;

pub use capture::*;
pub use metadata::*;
pub use router::*;
pub use state::*;
