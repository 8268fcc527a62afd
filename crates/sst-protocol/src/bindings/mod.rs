//! SAML bindings implementation.
//!
//! This module implements the two HTTP bindings the harness can decode:
//!
//! - **HTTP-POST Binding** - Messages are base64-encoded and sent in HTML forms
//! - **HTTP-Redirect Binding** - Messages are raw-deflated, base64-encoded and carried in the query
//!
//! [`BindingCodec`] is the lossless parameter-value codec. URL decoding of
//! redirect parameters is the transport's job and happens before the codec
//! sees the value.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sst_protocol::bindings::BindingCodec;
//!
//! let param = BindingCodec::encode_redirect("<samlp:Response/>")?;
//! assert_eq!(BindingCodec::decode_redirect(&param)?, "<samlp:Response/>");
//! ```

mod post;
mod redirect;

pub use post::*;
pub use redirect::*;

use base64::Engine;

use crate::error::ProtocolResult;
use crate::types::params;

/// SAML message type for binding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// AuthnRequest message.
    Request,
    /// Response message.
    Response,
}

impl MessageKind {
    /// Returns the parameter name carrying this message type.
    #[must_use]
    pub const fn param(&self) -> &'static str {
        match self {
            Self::Request => params::SAML_REQUEST,
            Self::Response => params::SAML_RESPONSE,
        }
    }
}

/// Encoder/decoder for binding parameter values.
///
/// For every string `x`, `decode_redirect(&encode_redirect(x)?)? == x` and
/// `decode_post(&encode_post(x))? == x`.
pub struct BindingCodec;

impl BindingCodec {
    /// Decodes an HTTP-Redirect parameter value: base64, then raw inflate.
    pub fn decode_redirect(param: &str) -> ProtocolResult<String> {
        let compressed = base64_decode(param)?;
        let xml_bytes = inflate_raw(&compressed)?;
        Ok(String::from_utf8(xml_bytes)?)
    }

    /// Decodes an HTTP-POST parameter value: base64 only.
    pub fn decode_post(param: &str) -> ProtocolResult<String> {
        let decoded = base64_decode(param)?;
        Ok(String::from_utf8(decoded)?)
    }

    /// Encodes XML as an HTTP-Redirect parameter value (not URL-encoded).
    pub fn encode_redirect(xml: &str) -> ProtocolResult<String> {
        let compressed = deflate_raw(xml.as_bytes())?;
        Ok(base64::engine::general_purpose::STANDARD.encode(compressed))
    }

    /// Encodes XML as an HTTP-POST parameter value.
    #[must_use]
    pub fn encode_post(xml: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(xml)
    }
}

/// Base64-decodes a parameter value, ignoring line-wrapping whitespace.
fn base64_decode(param: &str) -> ProtocolResult<Vec<u8>> {
    let compact: String = param.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}
