//! Captured protocol messages.

use super::constants::SamlBinding;

/// A protocol message intercepted by the capture endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedMessage {
    /// The decoded message XML, exactly as the target sent it.
    pub raw_xml: String,
    /// The binding the message arrived through.
    pub binding: SamlBinding,
    /// The RelayState that accompanied the message, if any.
    pub relay_state: Option<String>,
}

impl CapturedMessage {
    /// Creates a captured message without relay state.
    pub fn new(raw_xml: impl Into<String>, binding: SamlBinding) -> Self {
        Self {
            raw_xml: raw_xml.into(),
            binding,
            relay_state: None,
        }
    }

    /// Attaches the relay state that came with the message.
    #[must_use]
    pub fn with_relay_state(mut self, relay_state: Option<String>) -> Self {
        self.relay_state = relay_state;
        self
    }
}

/// What the capture endpoint observed for one recognized message.
///
/// A request that carried no recognized binding parameter produces no
/// outcome at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A message was received and decoded.
    Captured(CapturedMessage),
    /// A message was announced through a binding the harness cannot decode.
    Unsupported {
        /// The recognized binding.
        binding: SamlBinding,
    },
    /// A message parameter was present but its payload could not be decoded.
    Malformed {
        /// The binding whose parameter was present.
        binding: SamlBinding,
        /// The decode failure.
        error: String,
    },
}

impl CaptureOutcome {
    /// Returns the binding the outcome was observed on.
    #[must_use]
    pub const fn binding(&self) -> SamlBinding {
        match self {
            Self::Captured(message) => message.binding,
            Self::Unsupported { binding } | Self::Malformed { binding, .. } => *binding,
        }
    }

    /// Returns the captured message, if one was decoded.
    #[must_use]
    pub const fn message(&self) -> Option<&CapturedMessage> {
        match self {
            Self::Captured(message) => Some(message),
            _ => None,
        }
    }
}
