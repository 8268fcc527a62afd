//! Scripted interaction with the target's web UI.
//!
//! - [`Interaction`] - One scripted step (form, link or element)
//! - [`WebClient`] - The browser abstraction the steps run against
//! - [`HttpBrowser`] - `reqwest`-backed client with a cookie jar
//! - [`InteractionEngine`] - Replays the steps in order

mod browser;
mod engine;
#[cfg(test)]
pub(crate) mod fake;
mod forms;
mod page;

pub use browser::*;
pub use engine::*;
pub use page::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One scripted step of the login flow.
///
/// Serialized with a `type` tag: `"form"`, `"link"` or `"element"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Interaction {
    /// Fill in and submit a form.
    Form(FormInteraction),
    /// Follow a link.
    Link(LinkInteraction),
    /// Activate an arbitrary element.
    #[serde(rename = "element")]
    Generic(ElementInteraction),
}

impl Interaction {
    /// Short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Form(_) => "form",
            Self::Link(_) => "link",
            Self::Generic(_) => "element",
        }
    }
}

/// Form interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInteraction {
    /// CSS selector of the form, or of any element inside it.
    pub selector: String,

    /// Field values to set, by field name.
    #[serde(default)]
    pub values: BTreeMap<String, String>,

    /// CSS selector of the submit control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<String>,
}

/// Link interaction. At least one criterion must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInteraction {
    /// CSS selector the link must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Text the link's visible text must contain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_contains: Option<String>,
}

impl LinkInteraction {
    /// Describes the match criteria for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.selector, &self.text_contains) {
            (Some(sel), Some(text)) => format!("link '{sel}' containing '{text}'"),
            (Some(sel), None) => format!("link '{sel}'"),
            (None, Some(text)) => format!("link containing '{text}'"),
            (None, None) => "link (no criteria)".to_string(),
        }
    }
}

/// Generic element interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInteraction {
    /// CSS selector of the element.
    pub selector: String,
}
