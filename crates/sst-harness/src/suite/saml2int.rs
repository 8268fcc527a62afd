//! SAML2Int interoperability profile, Identity Provider side.
//!
//! See <https://kantarainitiative.github.io/SAMLprofiles/saml2int.html>.

use sst_protocol::types::{md, saml, status_codes};
use sst_protocol::{
    CapturedMessage, NameIdFormat, SamlBinding, XmlDocument, XmlElement, CONFIRMATION_METHOD_BEARER,
    MD_NS, NAMEFORMAT_URI, SAMLP_NS, SAML_NS,
};
use url::Url;

use super::{CaseInfo, ConfigCase, MetadataCase, ResponseCase, TestCase, TestSuite, Verdict};
use crate::config::TargetConfiguration;
use crate::report::TestStatus;

/// The SAML2Int test suite.
#[derive(Debug, Clone, Copy, Default)]
pub struct Saml2Int;

impl Saml2Int {
    /// Registry identifier.
    pub const ID: &'static str = "saml2int";

    /// Creates the suite.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TestSuite for Saml2Int {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        "SAML2Int interoperability profile (Identity Provider)"
    }

    fn mock_entity_id(&self) -> &'static str {
        "http://localhost:8080/sso"
    }

    fn mock_endpoint_url(&self) -> &'static str {
        "http://localhost:8080/sso"
    }

    fn test_cases(&self) -> &[TestCase] {
        CASES
    }
}

const CASES: &[TestCase] = &[
    TestCase::Config(ConfigCase {
        info: CaseInfo {
            name: "ConfigStartPageHTTPS",
            description: "Test if the login flow starts at a page served over TLS/SSL (RECOMMENDATION)",
            success_message: "The login flow starts at a page served over TLS/SSL",
            failed_message: "The login flow does not start at a page served over TLS/SSL",
        },
        check: config_start_page_https,
    }),
    TestCase::Config(ConfigCase {
        info: CaseInfo {
            name: "ConfigInteractionsDefined",
            description: "Test if the interactions needed to log in at the Identity Provider are configured",
            success_message: "The interactions needed to log in are configured",
            failed_message: "No interactions are configured, the Identity Provider must respond without user input",
        },
        check: config_interactions_defined,
    }),
    TestCase::Metadata(MetadataCase {
        info: CaseInfo {
            name: "MetadataAvailable",
            description: "Test if the Identity Provider's metadata is available (MUST requirement)",
            success_message: "The Identity Provider's metadata is available",
            failed_message: "The Identity Provider's metadata is not an EntityDescriptor",
        },
        check: metadata_available,
    }),
    TestCase::Metadata(MetadataCase {
        info: CaseInfo {
            name: "MetadataElementsAvailable",
            description: "Test if the Identity Provider's metadata contains all minimally required elements (MUST requirement)",
            success_message: "The Identity Provider's metadata contains all minimally required elements",
            failed_message: "The Identity Provider's metadata does not contain an IDPSSODescriptor with a KeyDescriptor and a SingleSignOnService",
        },
        check: metadata_elements_available,
    }),
    TestCase::Metadata(MetadataCase {
        info: CaseInfo {
            name: "MetadataNameIDFormat",
            description: "Test if the Identity Provider's metadata contains at least one NameIDFormat element (SHOULD requirement)",
            success_message: "The Identity Provider's metadata contains a NameIDFormat element",
            failed_message: "The Identity Provider's metadata does not contain a NameIDFormat element",
        },
        check: metadata_name_id_format,
    }),
    TestCase::Metadata(MetadataCase {
        info: CaseInfo {
            name: "MetadataNameIDFormatOther",
            description: "Test if the Identity Provider's metadata contains only transient or persistent NameIDFormat values (RECOMMENDATION)",
            success_message: "The Identity Provider's metadata contains only transient or persistent NameIDFormat values",
            failed_message: "The Identity Provider's metadata contains NameIDFormat values other than transient or persistent",
        },
        check: metadata_name_id_format_other,
    }),
    TestCase::Metadata(MetadataCase {
        info: CaseInfo {
            name: "MetadataHTTPS",
            description: "Test if the Identity Provider uses TLS/SSL for its Single Sign-On Service endpoints (RECOMMENDATION)",
            success_message: "The Identity Provider uses TLS/SSL for all its Single Sign-On Service endpoints",
            failed_message: "The Identity Provider does not use TLS/SSL for all its Single Sign-On Service endpoints",
        },
        check: metadata_https,
    }),
    TestCase::Metadata(MetadataCase {
        info: CaseInfo {
            name: "MetadataContactInfo",
            description: "Test if the Identity Provider's metadata contains contact information for a support and a technical contact (SHOULD requirement)",
            success_message: "The Identity Provider's metadata contains contact information for both a support and a technical contact",
            failed_message: "The Identity Provider's metadata does not contain contact information for both a support and a technical contact",
        },
        check: metadata_contact_info,
    }),
    TestCase::Metadata(MetadataCase {
        info: CaseInfo {
            name: "MetadataContactEmail",
            description: "Test if the Identity Provider's metadata contains EmailAddress elements for all its ContactPerson elements (SHOULD requirement)",
            success_message: "The Identity Provider's metadata contains EmailAddress elements for all its ContactPerson elements",
            failed_message: "The Identity Provider's metadata does not contain EmailAddress elements for all its ContactPerson elements",
        },
        check: metadata_contact_email,
    }),
    TestCase::Metadata(MetadataCase {
        info: CaseInfo {
            name: "MetadataAttrNameFormatURI",
            description: "Test if the attributes in the Identity Provider's metadata use the URI NameFormat (MUST requirement)",
            success_message: "All attributes in the Identity Provider's metadata use the URI NameFormat",
            failed_message: "Not all attributes in the Identity Provider's metadata use the URI NameFormat",
        },
        check: metadata_attr_name_format_uri,
    }),
    TestCase::Response(ResponseCase {
        info: CaseInfo {
            name: "ResponseByPost",
            description: "Test if the Identity Provider sends its Response using the HTTP-POST binding (MUST requirement)",
            success_message: "The Identity Provider sent its Response using the HTTP-POST binding",
            failed_message: "The Identity Provider did not send its Response using the HTTP-POST binding",
        },
        sp_initiated: true,
        check: response_by_post,
    }),
    TestCase::Response(ResponseCase {
        info: CaseInfo {
            name: "ResponseStatusSuccess",
            description: "Test if the Identity Provider's Response reports a successful login (MUST requirement)",
            success_message: "The Identity Provider's Response has a Success status",
            failed_message: "The Identity Provider's Response does not have a Success status",
        },
        sp_initiated: true,
        check: response_status_success,
    }),
    TestCase::Response(ResponseCase {
        info: CaseInfo {
            name: "ResponseContainsAssertion",
            description: "Test if the Identity Provider's Response contains an assertion (MUST requirement)",
            success_message: "The Identity Provider's Response contains an assertion",
            failed_message: "The Identity Provider's Response does not contain an assertion",
        },
        sp_initiated: true,
        check: response_contains_assertion,
    }),
    TestCase::Response(ResponseCase {
        info: CaseInfo {
            name: "ResponseSubjectConfirmationBearer",
            description: "Test if the Identity Provider's assertion uses the bearer subject confirmation method (MUST requirement)",
            success_message: "The Identity Provider's assertion uses the bearer subject confirmation method",
            failed_message: "The Identity Provider's assertion does not use the bearer subject confirmation method",
        },
        sp_initiated: true,
        check: response_subject_confirmation_bearer,
    }),
    TestCase::Response(ResponseCase {
        info: CaseInfo {
            name: "IdPInitiatedResponse",
            description: "Test if the Identity Provider can send an unsolicited Response (SHOULD requirement)",
            success_message: "The Identity Provider sent an unsolicited Response",
            failed_message: "The Identity Provider did not send a valid unsolicited Response",
        },
        sp_initiated: false,
        check: idp_initiated_response,
    }),
];

// ============================================================================
// Configuration rules
// ============================================================================

fn config_start_page_https(config: &TargetConfiguration) -> Verdict {
    match config.start_url() {
        None => Verdict::critical("The test case could not be performed because no start page is configured"),
        Some(url) if url.scheme() == "https" => Verdict::ok(),
        Some(url) => Verdict::warning(format!("The start page {url} does not use TLS/SSL")),
    }
}

fn config_interactions_defined(config: &TargetConfiguration) -> Verdict {
    if config.interactions().is_empty() {
        Verdict::failed(TestStatus::Warning)
    } else {
        Verdict::ok()
    }
}

// ============================================================================
// Metadata rules
// ============================================================================

fn metadata_available(doc: &XmlDocument) -> Verdict {
    if doc.root().is_named(MD_NS, md::ENTITY_DESCRIPTOR) {
        Verdict::ok()
    } else {
        Verdict::error(format!(
            "The metadata root element is {}, expected an EntityDescriptor",
            doc.root().local_name()
        ))
    }
}

fn metadata_elements_available(doc: &XmlDocument) -> Verdict {
    let descriptors = doc.elements_by_name_ns(MD_NS, md::IDP_SSO_DESCRIPTOR);
    if descriptors.is_empty() {
        return Verdict::error("The metadata does not contain an IDPSSODescriptor");
    }

    let complete = descriptors.iter().any(|idp| {
        idp.child_elements_named(MD_NS, md::KEY_DESCRIPTOR).next().is_some()
            && idp
                .child_elements_named(MD_NS, md::SINGLE_SIGN_ON_SERVICE)
                .next()
                .is_some()
    });
    if complete {
        Verdict::ok()
    } else {
        Verdict::failed(TestStatus::Error)
    }
}

fn metadata_name_id_format(doc: &XmlDocument) -> Verdict {
    if doc.elements_by_name_ns(MD_NS, md::NAME_ID_FORMAT).is_empty() {
        Verdict::failed(TestStatus::Warning)
    } else {
        Verdict::ok()
    }
}

fn metadata_name_id_format_other(doc: &XmlDocument) -> Verdict {
    let formats = doc.elements_by_name_ns(MD_NS, md::NAME_ID_FORMAT);
    if formats.is_empty() {
        return Verdict::warning("The metadata does not contain any NameIDFormat elements");
    }

    let others: Vec<&str> = formats
        .iter()
        .map(XmlElement::text)
        .filter(|value| {
            !matches!(
                NameIdFormat::from_uri(value),
                Some(NameIdFormat::Transient | NameIdFormat::Persistent)
            )
        })
        .collect();
    if others.is_empty() {
        Verdict::ok()
    } else {
        Verdict::warning(format!(
            "The metadata contains other NameIDFormat values: {}",
            others.join(", ")
        ))
    }
}

fn metadata_https(doc: &XmlDocument) -> Verdict {
    let locations: Vec<&str> = doc
        .elements_by_name_ns(MD_NS, md::SINGLE_SIGN_ON_SERVICE)
        .iter()
        .filter_map(|sso| sso.attribute(md::LOCATION))
        .collect();
    if locations.is_empty() {
        return Verdict::warning("The metadata does not contain any SingleSignOnService locations");
    }

    let mut insecure = Vec::new();
    for location in locations {
        match Url::parse(location) {
            Ok(url) if url.scheme() == "https" => {}
            Ok(_) => insecure.push(location),
            Err(e) => {
                return Verdict::critical(format!(
                    "The SingleSignOnService location '{location}' is not a valid URL: {e}"
                ))
            }
        }
    }
    if insecure.is_empty() {
        Verdict::ok()
    } else {
        Verdict::warning(format!(
            "These SingleSignOnService locations do not use TLS/SSL: {}",
            insecure.join(", ")
        ))
    }
}

fn metadata_contact_info(doc: &XmlDocument) -> Verdict {
    let contacts = doc.elements_by_name_ns(MD_NS, md::CONTACT_PERSON);
    if contacts.is_empty() {
        return Verdict::warning("The metadata does not contain any ContactPerson elements");
    }

    let has = |kind: &str| {
        contacts
            .iter()
            .any(|c| c.attribute(md::CONTACT_TYPE) == Some(kind))
    };
    match (has(md::CONTACT_TYPE_SUPPORT), has(md::CONTACT_TYPE_TECHNICAL)) {
        (true, true) => Verdict::ok(),
        (false, true) => Verdict::warning("The metadata does not contain a support contact"),
        (true, false) => Verdict::warning("The metadata does not contain a technical contact"),
        (false, false) => Verdict::failed(TestStatus::Warning),
    }
}

fn metadata_contact_email(doc: &XmlDocument) -> Verdict {
    let contacts = doc.elements_by_name_ns(MD_NS, md::CONTACT_PERSON);
    if contacts.is_empty() {
        return Verdict::warning("The metadata does not contain any ContactPerson elements");
    }

    let missing = contacts
        .iter()
        .filter(|c| {
            c.child_elements_named(MD_NS, md::EMAIL_ADDRESS)
                .all(|email| email.text().is_empty())
        })
        .count();
    if missing == 0 {
        Verdict::ok()
    } else {
        Verdict::warning(format!(
            "{missing} of {} ContactPerson elements have no EmailAddress",
            contacts.len()
        ))
    }
}

fn metadata_attr_name_format_uri(doc: &XmlDocument) -> Verdict {
    let offending: Vec<&str> = doc
        .elements_by_name_ns(SAML_NS, saml::ATTRIBUTE)
        .iter()
        .filter(|attr| attr.attribute(saml::NAME_FORMAT) != Some(NAMEFORMAT_URI))
        .map(|attr| attr.attribute("Name").unwrap_or("(unnamed)"))
        .collect();
    if offending.is_empty() {
        Verdict::ok()
    } else {
        Verdict::warning(format!(
            "These attributes do not use the URI NameFormat: {}",
            offending.join(", ")
        ))
    }
}

// ============================================================================
// Response rules
// ============================================================================

/// Parses the captured message and checks it is a `samlp:Response`.
fn parse_response(message: &CapturedMessage) -> Result<XmlDocument, Verdict> {
    let doc = XmlDocument::parse(&message.raw_xml).map_err(|e| {
        Verdict::critical(format!("The received message could not be parsed: {e}"))
    })?;
    if doc.root().is_named(SAMLP_NS, saml::RESPONSE) {
        Ok(doc)
    } else {
        Err(Verdict::critical(format!(
            "The received message is a {}, not a Response",
            doc.root().local_name()
        )))
    }
}

fn response_by_post(message: &CapturedMessage) -> Verdict {
    if message.binding == SamlBinding::HttpPost {
        Verdict::ok()
    } else {
        Verdict::error(format!(
            "The Identity Provider sent its Response using the {} binding",
            message.binding
        ))
    }
}

fn response_status_success(message: &CapturedMessage) -> Verdict {
    let doc = match parse_response(message) {
        Ok(doc) => doc,
        Err(verdict) => return verdict,
    };

    let code = doc
        .root()
        .child_elements_named(SAMLP_NS, saml::STATUS)
        .next()
        .and_then(|status| status.child_elements_named(SAMLP_NS, saml::STATUS_CODE).next())
        .and_then(|code| code.attribute(saml::VALUE));
    match code {
        Some(status_codes::SUCCESS) => Verdict::ok(),
        Some(other) => Verdict::error(format!("The Response has status {other}")),
        None => Verdict::error("The Response does not contain a StatusCode"),
    }
}

fn response_contains_assertion(message: &CapturedMessage) -> Verdict {
    let doc = match parse_response(message) {
        Ok(doc) => doc,
        Err(verdict) => return verdict,
    };

    let root = doc.root();
    let has_assertion = root.child_elements_named(SAML_NS, saml::ASSERTION).next().is_some()
        || root
            .child_elements_named(SAML_NS, saml::ENCRYPTED_ASSERTION)
            .next()
            .is_some();
    if has_assertion {
        Verdict::ok()
    } else {
        Verdict::failed(TestStatus::Error)
    }
}

fn response_subject_confirmation_bearer(message: &CapturedMessage) -> Verdict {
    let doc = match parse_response(message) {
        Ok(doc) => doc,
        Err(verdict) => return verdict,
    };

    let root = doc.root();
    let confirmations = root.descendants_named(SAML_NS, saml::SUBJECT_CONFIRMATION);
    if confirmations.is_empty() {
        if !root.descendants_named(SAML_NS, saml::ENCRYPTED_ASSERTION).is_empty() {
            return Verdict::warning(
                "The assertion is encrypted, its subject confirmation could not be inspected",
            );
        }
        return Verdict::error("The Response does not contain a SubjectConfirmation");
    }

    if confirmations
        .iter()
        .any(|c| c.attribute(saml::METHOD) == Some(CONFIRMATION_METHOD_BEARER))
    {
        Verdict::ok()
    } else {
        Verdict::failed(TestStatus::Error)
    }
}

fn idp_initiated_response(message: &CapturedMessage) -> Verdict {
    let doc = match parse_response(message) {
        Ok(doc) => doc,
        Err(verdict) => return verdict,
    };

    match doc.root().attribute(saml::IN_RESPONSE_TO) {
        None => Verdict::ok(),
        Some(id) => Verdict::warning(format!(
            "The unsolicited Response refers to a request ({id}) that was never sent"
        )),
    }
}
