//! HTTP-Redirect Binding implementation.
//!
//! Implements the SAML 2.0 HTTP-Redirect binding for sending SAML messages
//! via URL query parameters with raw DEFLATE compression.

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::error::{ProtocolError, ProtocolResult};
use crate::types::params;

use super::{BindingCodec, MessageKind};

/// Upper bound on the inflated size of a redirect-bound message.
const MAX_INFLATED_SIZE: usize = 1024 * 1024;

/// HTTP-Redirect binding encoder/decoder.
pub struct HttpRedirectBinding;

impl HttpRedirectBinding {
    /// Encodes a SAML message for HTTP-Redirect binding.
    ///
    /// Returns `destination` with the encoded message (and relay state) appended
    /// as URL-encoded query parameters.
    pub fn encode_url(
        xml: &str,
        destination: &str,
        relay_state: Option<&str>,
        kind: MessageKind,
    ) -> ProtocolResult<String> {
        let encoded = BindingCodec::encode_redirect(xml)?;
        let separator = if destination.contains('?') { '&' } else { '?' };

        let mut url = format!(
            "{}{}{}={}",
            destination,
            separator,
            kind.param(),
            urlencoding::encode(&encoded)
        );

        if let Some(rs) = relay_state {
            url.push('&');
            url.push_str(params::RELAY_STATE);
            url.push('=');
            url.push_str(&urlencoding::encode(rs));
        }

        Ok(url)
    }

    /// Decodes the message carried in a full redirect URL.
    ///
    /// Returns `None` when the URL carries neither `SAMLRequest` nor `SAMLResponse`.
    pub fn decode_url(url: &str) -> ProtocolResult<Option<(MessageKind, String)>> {
        let parsed = url::Url::parse(url)?;

        let mut request = None;
        let mut response = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                params::SAML_REQUEST => request = Some(value.into_owned()),
                params::SAML_RESPONSE => response = Some(value.into_owned()),
                _ => {}
            }
        }

        let (kind, encoded) = match (request, response) {
            (Some(req), _) => (MessageKind::Request, req),
            (None, Some(resp)) => (MessageKind::Response, resp),
            (None, None) => return Ok(None),
        };

        BindingCodec::decode_redirect(&encoded).map(|xml| Some((kind, xml)))
    }
}

/// Compresses data using DEFLATE (raw, no zlib header).
pub(crate) fn deflate_raw(data: &[u8]) -> ProtocolResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| ProtocolError::Deflate(format!("compression error: {e}")))?;
    encoder
        .finish()
        .map_err(|e| ProtocolError::Deflate(format!("compression finish error: {e}")))
}

/// Decompresses raw DEFLATE data.
///
/// The stream must reach its final block; a truncated stream is an error
/// rather than a silently shortened message.
pub(crate) fn inflate_raw(data: &[u8]) -> ProtocolResult<Vec<u8>> {
    let mut inflater = Decompress::new(false);
    let mut output = Vec::with_capacity(data.len().saturating_mul(4).clamp(64, MAX_INFLATED_SIZE));

    loop {
        if output.len() == output.capacity() {
            if output.len() >= MAX_INFLATED_SIZE {
                return Err(ProtocolError::Deflate(format!(
                    "inflated message exceeds {MAX_INFLATED_SIZE} bytes"
                )));
            }
            let grow = output.len().min(MAX_INFLATED_SIZE - output.len()).max(64);
            output.reserve_exact(grow);
        }

        let consumed = usize::try_from(inflater.total_in())
            .map_err(|e| ProtocolError::Deflate(e.to_string()))?;
        let produced_before = output.len();

        let status = inflater
            .decompress_vec(&data[consumed..], &mut output, FlushDecompress::Finish)
            .map_err(|e| ProtocolError::Deflate(format!("decompression error: {e}")))?;

        match status {
            Status::StreamEnd => return Ok(output),
            Status::Ok | Status::BufError => {
                let consumed_after = usize::try_from(inflater.total_in())
                    .map_err(|e| ProtocolError::Deflate(e.to_string()))?;
                let stalled = consumed_after == consumed && output.len() == produced_before;
                let has_room = output.len() < output.capacity();
                if has_room && (consumed_after == data.len() || stalled) {
                    return Err(ProtocolError::Deflate(
                        "truncated deflate stream".to_string(),
                    ));
                }
            }
        }
    }
}
