//! Protocol error types.
//!
//! Every variant here is a decode-side failure: the payload that reached the
//! harness could not be turned back into protocol XML.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// SAML protocol errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// Deflate compression or decompression error.
    #[error("deflate error: {0}")]
    Deflate(String),

    /// The decoded payload was not UTF-8 text.
    #[error("invalid UTF-8 in message: {0}")]
    InvalidUtf8(String),

    /// The message parameter or its decoded payload was blank.
    #[error("empty message")]
    EmptyMessage,

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Binding recognized but not decodable by the harness.
    #[error("unsupported binding: {0}")]
    UnsupportedBinding(String),

    /// Malformed URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ProtocolError {
    /// Returns true if this error came from decoding a binding payload.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::Base64Decode(_) | Self::Deflate(_) | Self::InvalidUtf8(_) | Self::EmptyMessage
        )
    }
}

impl From<quick_xml::Error> for ProtocolError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<base64::DecodeError> for ProtocolError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64Decode(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for ProtocolError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::InvalidUtf8(err.to_string())
    }
}

impl From<url::ParseError> for ProtocolError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
