//! SAML 2.0 constants and the captured-message data model.

mod constants;
mod message;

pub use constants::*;
pub use message::*;
