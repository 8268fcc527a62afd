//! Pages returned by the web client.

use url::Url;

/// A page reached by the web client, after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final URL of the page.
    pub url: Url,
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Response body as text.
    pub body: String,
}

impl Page {
    /// Creates a page.
    pub fn new(url: Url, status: u16, content_type: Option<String>, body: impl Into<String>) -> Self {
        Self {
            url,
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Creates a `200 text/html` page.
    pub fn html(url: Url, body: impl Into<String>) -> Self {
        Self::new(url, 200, Some("text/html; charset=utf-8".to_string()), body)
    }

    /// Returns the media type without parameters, lowercased.
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    /// Returns true if the page can carry form and link semantics.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(
            self.media_type().as_deref(),
            Some("text/html" | "application/xhtml+xml")
        )
    }
}
