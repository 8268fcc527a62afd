//! SAML 2.0 constants and URIs.
//!
//! Namespace URIs, binding identifiers and the element/attribute names the
//! conformance rules look up in metadata and protocol messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// SAML 2.0 assertion namespace URI.
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// SAML 2.0 protocol namespace URI.
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// SAML 2.0 metadata namespace URI.
pub const MD_NS: &str = "urn:oasis:names:tc:SAML:2.0:metadata";

/// XML Digital Signature namespace URI.
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// The `xml:` prefix namespace (used by `xml:lang`).
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// SAML 2.0 protocol support enumeration value.
pub const SAML20_PROTOCOL: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// Attribute `NameFormat` required by SAML2Int.
pub const NAMEFORMAT_URI: &str = "urn:oasis:names:tc:SAML:2.0:attrname-format:uri";

/// Bearer subject confirmation method.
pub const CONFIRMATION_METHOD_BEARER: &str = "urn:oasis:names:tc:SAML:2.0:cm:bearer";

// ============================================================================
// Binding URIs
// ============================================================================

/// SAML binding types recognized by the capture endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamlBinding {
    /// HTTP POST binding.
    HttpPost,
    /// HTTP Redirect binding.
    HttpRedirect,
    /// HTTP Artifact binding (recognized, never decoded).
    HttpArtifact,
}

impl SamlBinding {
    /// Returns the URI for this binding.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::HttpPost => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST",
            Self::HttpRedirect => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect",
            Self::HttpArtifact => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Artifact",
        }
    }

    /// Parses a binding from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST" => Some(Self::HttpPost),
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect" => Some(Self::HttpRedirect),
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Artifact" => Some(Self::HttpArtifact),
            _ => None,
        }
    }

    /// Returns true if the harness can decode messages carried by this binding.
    #[must_use]
    pub const fn is_decodable(&self) -> bool {
        !matches!(self, Self::HttpArtifact)
    }
}

impl fmt::Display for SamlBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

// ============================================================================
// Binding parameter names
// ============================================================================

/// HTTP parameter names defined by the bindings.
pub mod params {
    /// Request message parameter (Redirect and POST).
    pub const SAML_REQUEST: &str = "SAMLRequest";

    /// Response message parameter (Redirect and POST).
    pub const SAML_RESPONSE: &str = "SAMLResponse";

    /// Artifact parameter.
    pub const SAML_ART: &str = "SAMLart";

    /// Relay state parameter.
    pub const RELAY_STATE: &str = "RelayState";
}

// ============================================================================
// Name ID Formats
// ============================================================================

/// SAML Name ID formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameIdFormat {
    /// Unspecified name ID format.
    #[default]
    Unspecified,
    /// Email address format.
    Email,
    /// Persistent identifier format.
    Persistent,
    /// Transient identifier format.
    Transient,
}

impl NameIdFormat {
    /// Returns the URI for this name ID format.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Unspecified => "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified",
            Self::Email => "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
            Self::Persistent => "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
            Self::Transient => "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
        }
    }

    /// Parses a name ID format from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified" => Some(Self::Unspecified),
            "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress" => Some(Self::Email),
            "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent" => Some(Self::Persistent),
            "urn:oasis:names:tc:SAML:2.0:nameid-format:transient" => Some(Self::Transient),
            _ => None,
        }
    }
}

// ============================================================================
// Status Codes
// ============================================================================

/// Top-level SAML status codes.
pub mod status_codes {
    /// Success status code.
    pub const SUCCESS: &str = "urn:oasis:names:tc:SAML:2.0:status:Success";

    /// Requester error status code.
    pub const REQUESTER: &str = "urn:oasis:names:tc:SAML:2.0:status:Requester";

    /// Responder error status code.
    pub const RESPONDER: &str = "urn:oasis:names:tc:SAML:2.0:status:Responder";
}

// ============================================================================
// Element and attribute names
// ============================================================================

/// Metadata element and attribute local names.
pub mod md {
    /// `EntityDescriptor` element.
    pub const ENTITY_DESCRIPTOR: &str = "EntityDescriptor";
    /// `IDPSSODescriptor` element.
    pub const IDP_SSO_DESCRIPTOR: &str = "IDPSSODescriptor";
    /// `SPSSODescriptor` element.
    pub const SP_SSO_DESCRIPTOR: &str = "SPSSODescriptor";
    /// `KeyDescriptor` element.
    pub const KEY_DESCRIPTOR: &str = "KeyDescriptor";
    /// `SingleSignOnService` element.
    pub const SINGLE_SIGN_ON_SERVICE: &str = "SingleSignOnService";
    /// `AssertionConsumerService` element.
    pub const ASSERTION_CONSUMER_SERVICE: &str = "AssertionConsumerService";
    /// `NameIDFormat` element.
    pub const NAME_ID_FORMAT: &str = "NameIDFormat";
    /// `ContactPerson` element.
    pub const CONTACT_PERSON: &str = "ContactPerson";
    /// `EmailAddress` element.
    pub const EMAIL_ADDRESS: &str = "EmailAddress";
    /// `entityID` attribute.
    pub const ENTITY_ID: &str = "entityID";
    /// `Binding` attribute.
    pub const BINDING: &str = "Binding";
    /// `Location` attribute.
    pub const LOCATION: &str = "Location";
    /// `contactType` attribute.
    pub const CONTACT_TYPE: &str = "contactType";
    /// `support` contact type.
    pub const CONTACT_TYPE_SUPPORT: &str = "support";
    /// `technical` contact type.
    pub const CONTACT_TYPE_TECHNICAL: &str = "technical";
}

/// Assertion and protocol element and attribute local names.
pub mod saml {
    /// `Response` element.
    pub const RESPONSE: &str = "Response";
    /// `Assertion` element.
    pub const ASSERTION: &str = "Assertion";
    /// `EncryptedAssertion` element.
    pub const ENCRYPTED_ASSERTION: &str = "EncryptedAssertion";
    /// `Attribute` element.
    pub const ATTRIBUTE: &str = "Attribute";
    /// `Status` element.
    pub const STATUS: &str = "Status";
    /// `StatusCode` element.
    pub const STATUS_CODE: &str = "StatusCode";
    /// `InResponseTo` attribute.
    pub const IN_RESPONSE_TO: &str = "InResponseTo";
    /// `SubjectConfirmation` element.
    pub const SUBJECT_CONFIRMATION: &str = "SubjectConfirmation";
    /// `NameFormat` attribute.
    pub const NAME_FORMAT: &str = "NameFormat";
    /// `Value` attribute.
    pub const VALUE: &str = "Value";
    /// `Method` attribute.
    pub const METHOD: &str = "Method";
}
