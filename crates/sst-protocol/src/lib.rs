//! SAML 2.0 Web SSO protocol plumbing for the conformance harness.
//!
//! This crate holds everything that touches the wire:
//!
//! - **Binding codec** - Encode and decode messages carried over HTTP-Redirect and HTTP-POST
//! - **XML document model** - Namespace-aware parsing of captured messages and metadata
//! - **Capture endpoint** - The mock counterparty that intercepts the message the target sends
//! - **Mock metadata** - The metadata the mock endpoint publishes for its own entity
//!
//! # Architecture
//!
//! - [`bindings`] - HTTP-Redirect and HTTP-POST binding codecs
//! - [`types`] - SAML constants and binding identifiers
//! - [`xml`] - Lightweight DOM over `quick-xml`
//! - [`endpoints`] - Axum handlers and the capture slot
//! - [`error`] - Error types for protocol operations
//!
//! # Example
//!
//! ```rust,ignore
//! use sst_protocol::endpoints::{capture_router, CaptureSlot, CaptureState};
//!
//! let slot = CaptureSlot::new();
//! let app = capture_router("/sso").with_state(CaptureState::new(slot.clone()));
//! ```
//!
//! # SAML Specifications
//!
//! - [SAML 2.0 Bindings](https://docs.oasis-open.org/security/saml/v2.0/saml-bindings-2.0-os.pdf)
//! - [SAML 2.0 Metadata](https://docs.oasis-open.org/security/saml/v2.0/saml-metadata-2.0-os.pdf)
//! - [SAML2Int](https://kantarainitiative.github.io/SAMLprofiles/saml2int.html)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bindings;
pub mod endpoints;
pub mod error;
pub mod types;
pub mod xml;

pub use bindings::BindingCodec;
pub use error::{ProtocolError, ProtocolResult};
pub use types::*;
pub use xml::{XmlDocument, XmlElement};
