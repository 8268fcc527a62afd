//! Mock service provider metadata.
//!
//! The capture endpoint acts as an SP towards the target, so it publishes SP
//! metadata the target can be configured with.

use crate::bindings::html_escape;
use crate::types::{NameIdFormat, SamlBinding, MD_NS, SAML20_PROTOCOL};

/// Renders SP metadata for the mock endpoint.
///
/// Both the HTTP-POST and HTTP-Redirect assertion consumer services point at
/// `acs_url`.
#[must_use]
pub fn mock_sp_metadata(entity_id: &str, acs_url: &str) -> String {
    let entity_id = html_escape(entity_id);
    let acs_url = html_escape(acs_url);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<md:EntityDescriptor xmlns:md="{}" entityID="{}">
    <md:SPSSODescriptor AuthnRequestsSigned="false" WantAssertionsSigned="false" protocolSupportEnumeration="{}">
        <md:NameIDFormat>{}</md:NameIDFormat>
        <md:NameIDFormat>{}</md:NameIDFormat>
        <md:AssertionConsumerService Binding="{}" Location="{}" index="0" isDefault="true"/>
        <md:AssertionConsumerService Binding="{}" Location="{}" index="1"/>
    </md:SPSSODescriptor>
</md:EntityDescriptor>"#,
        MD_NS,
        entity_id,
        SAML20_PROTOCOL,
        NameIdFormat::Persistent.uri(),
        NameIdFormat::Transient.uri(),
        SamlBinding::HttpPost.uri(),
        acs_url,
        SamlBinding::HttpRedirect.uri(),
        acs_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::md;
    use crate::xml::XmlDocument;

    #[test]
    fn metadata_describes_both_bindings() {
        let xml = mock_sp_metadata("https://sp.test/entity", "https://localhost:8080/sso?a=1&b=2");
        let doc = XmlDocument::parse(&xml).unwrap();

        assert_eq!(doc.root().attribute(md::ENTITY_ID), Some("https://sp.test/entity"));
        assert_eq!(doc.elements_by_name_ns(MD_NS, md::SP_SSO_DESCRIPTOR).len(), 1);

        let acs = doc.elements_by_name_ns(MD_NS, md::ASSERTION_CONSUMER_SERVICE);
        let bindings: Vec<_> = acs.iter().filter_map(|e| e.attribute(md::BINDING)).collect();
        assert_eq!(
            bindings,
            vec![SamlBinding::HttpPost.uri(), SamlBinding::HttpRedirect.uri()]
        );
        assert!(acs
            .iter()
            .all(|e| e.attribute(md::LOCATION) == Some("https://localhost:8080/sso?a=1&b=2")));
    }
}
