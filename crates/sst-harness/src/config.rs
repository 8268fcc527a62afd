//! Harness configuration.
//!
//! The target configuration is a JSON document describing the system under
//! test. Harness settings are loaded from environment variables with
//! sensible defaults.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use sst_protocol::types::md;
use sst_protocol::{XmlDocument, XmlElement, MD_NS};
use url::Url;

use crate::error::{HarnessError, HarnessResult};
use crate::interaction::Interaction;

/// On-disk shape of the target configuration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTargetConfiguration {
    #[serde(default, alias = "startUrl")]
    start_page: Option<String>,

    #[serde(default)]
    idp_initiated_page: Option<String>,

    #[serde(default)]
    metadata: Option<String>,

    #[serde(default)]
    pre_response_interactions: Vec<Interaction>,
}

/// Configuration of the target under test.
///
/// Loaded once at startup and immutable for the run.
#[derive(Debug, Clone, Default)]
pub struct TargetConfiguration {
    start_url: Option<Url>,
    idp_initiated_url: Option<Url>,
    metadata: Option<XmlDocument>,
    interactions: Vec<Interaction>,
}

impl TargetConfiguration {
    /// Creates a configuration that starts at `start_url`.
    #[must_use]
    pub fn new(start_url: Url) -> Self {
        Self {
            start_url: Some(start_url),
            ..Self::default()
        }
    }

    /// Sets the IdP-initiated entry point.
    #[must_use]
    pub fn with_idp_initiated_url(mut self, url: Url) -> Self {
        self.idp_initiated_url = Some(url);
        self
    }

    /// Sets the target's metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: XmlDocument) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Sets the interactions replayed before the target responds.
    #[must_use]
    pub fn with_interactions(mut self, interactions: Vec<Interaction>) -> Self {
        self.interactions = interactions;
        self
    }

    /// Loads the configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            interactions = config.interactions.len(),
            metadata = config.metadata.is_some(),
            "target configuration loaded"
        );
        Ok(config)
    }

    /// Parses the configuration from JSON text.
    pub fn from_json(json: &str) -> HarnessResult<Self> {
        let raw: RawTargetConfiguration = serde_json::from_str(json)?;

        let start_url = raw
            .start_page
            .as_deref()
            .map(|s| parse_url("startPage", s))
            .transpose()?;
        let idp_initiated_url = raw
            .idp_initiated_page
            .as_deref()
            .map(|s| parse_url("idpInitiatedPage", s))
            .transpose()?;

        let metadata = match raw.metadata.as_deref().map(str::trim) {
            Some(xml) if !xml.is_empty() => Some(
                XmlDocument::parse(xml)
                    .map_err(|e| HarnessError::Config(format!("metadata is not valid XML: {e}")))?,
            ),
            _ => None,
        };

        for (step, interaction) in raw.pre_response_interactions.iter().enumerate() {
            if let Interaction::Link(link) = interaction {
                if link.selector.is_none() && link.text_contains.is_none() {
                    return Err(HarnessError::Config(format!(
                        "link interaction {step} needs a selector or textContains"
                    )));
                }
            }
        }

        Ok(Self {
            start_url,
            idp_initiated_url,
            metadata,
            interactions: raw.pre_response_interactions,
        })
    }

    /// Where SP-initiated flows start.
    #[must_use]
    pub const fn start_url(&self) -> Option<&Url> {
        self.start_url.as_ref()
    }

    /// Where IdP-initiated flows start, falling back to the start page.
    #[must_use]
    pub fn idp_initiated_url(&self) -> Option<&Url> {
        self.idp_initiated_url.as_ref().or(self.start_url.as_ref())
    }

    /// The target's metadata, if configured.
    #[must_use]
    pub const fn metadata(&self) -> Option<&XmlDocument> {
        self.metadata.as_ref()
    }

    /// Interactions replayed before the target sends its response.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Metadata elements with the given local name in the metadata namespace.
    ///
    /// `None` when no metadata is configured.
    #[must_use]
    pub fn md_elements(&self, local_name: &str) -> Option<Vec<XmlElement<'_>>> {
        self.metadata
            .as_ref()
            .map(|doc| doc.elements_by_name_ns(MD_NS, local_name))
    }

    /// Values of `attr` on every metadata element named `local_name` that carries it.
    #[must_use]
    pub fn md_attributes(&self, local_name: &str, attr: &str) -> Option<Vec<&str>> {
        self.md_elements(local_name)
            .map(|els| els.iter().filter_map(|el| el.attribute(attr)).collect())
    }

    /// Value of `attr` if exactly one metadata element named `local_name` carries it.
    #[must_use]
    pub fn md_attribute(&self, local_name: &str, attr: &str) -> Option<&str> {
        match self.md_attributes(local_name, attr)?.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// Location of the SingleSignOnService for `binding` (compared case-insensitively).
    #[must_use]
    pub fn md_sso_location(&self, binding: &str) -> Option<&str> {
        self.md_elements(md::SINGLE_SIGN_ON_SERVICE)?
            .into_iter()
            .find(|sso| {
                sso.attribute(md::BINDING)
                    .is_some_and(|b| b.eq_ignore_ascii_case(binding))
            })
            .and_then(|sso| sso.attribute(md::LOCATION))
    }
}

fn parse_url(key: &str, value: &str) -> HarnessResult<Url> {
    Url::parse(value).map_err(|e| HarnessError::Config(format!("{key} is not an absolute URL: {e}")))
}

/// Runtime settings of the harness.
#[derive(Debug, Clone)]
pub struct HarnessSettings {
    /// Accept invalid TLS certificates.
    pub insecure: bool,

    /// How long to wait for a message after the round trip completes.
    pub capture_grace: Duration,

    /// Submit pages that auto-post a SAML message.
    pub auto_post: bool,

    /// Maximum redirects followed per navigation.
    pub max_redirects: usize,

    /// Timeout per HTTP request.
    pub http_timeout: Duration,
}

impl HarnessSettings {
    /// Loads settings from environment variables.
    pub fn from_env() -> Self {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let capture_grace_ms = std::env::var("SST_CAPTURE_GRACE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2000);

        let http_timeout_secs = std::env::var("SST_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let max_redirects = std::env::var("SST_MAX_REDIRECTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        let auto_post = std::env::var("SST_AUTO_POST")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        let insecure = std::env::var("SST_INSECURE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Self {
            insecure,
            capture_grace: Duration::from_millis(capture_grace_ms),
            auto_post,
            max_redirects,
            http_timeout: Duration::from_secs(http_timeout_secs),
        }
    }

    /// Creates settings for testing: short grace period, no TLS relaxation.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            capture_grace: Duration::from_millis(200),
            http_timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            insecure: false,
            capture_grace: Duration::from_secs(2),
            auto_post: true,
            max_redirects: 20,
            http_timeout: Duration::from_secs(30),
        }
    }
}
