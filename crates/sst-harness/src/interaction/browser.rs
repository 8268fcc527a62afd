//! Web client abstraction and the `reqwest`-backed browser.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use url::Url;

use super::forms::{self, Activation, FormMethod, FormSubmission};
use super::{LinkInteraction, Page};
use crate::config::HarnessSettings;
use crate::error::InteractionError;

/// Auto-post pages submitted in a row before giving up.
const MAX_AUTO_POST_HOPS: usize = 5;

/// Browser the interaction engine drives.
///
/// Every navigation follows redirects to completion before returning, so a
/// message sent to the capture endpoint has been handled by the time the
/// call returns.
#[async_trait]
pub trait WebClient: Send + Sync {
    /// Fetches `url`.
    async fn fetch(&self, url: &Url) -> Result<Page, InteractionError>;

    /// Fills in the form matched by `selector` and submits it.
    async fn submit_form(
        &self,
        page: &Page,
        selector: &str,
        values: &BTreeMap<String, String>,
        submit: Option<&str>,
    ) -> Result<Page, InteractionError>;

    /// Follows the first link matching `link`.
    async fn click_link(&self, page: &Page, link: &LinkInteraction) -> Result<Page, InteractionError>;

    /// Activates the element matched by `selector`.
    async fn click_element(&self, page: &Page, selector: &str) -> Result<Page, InteractionError>;
}

/// HTTP browser with a cookie jar and bounded redirect following.
///
/// It does not run scripts. Pages that carry a SAML message in a form meant
/// to be auto-submitted on load are submitted by the browser itself unless
/// auto-post is disabled.
#[derive(Debug, Clone)]
pub struct HttpBrowser {
    client: reqwest::Client,
    auto_post: bool,
}

impl HttpBrowser {
    /// Creates a browser from harness settings.
    pub fn new(settings: &HarnessSettings) -> Result<Self, InteractionError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::limited(settings.max_redirects))
            .timeout(settings.http_timeout)
            .danger_accept_invalid_certs(settings.insecure)
            .user_agent(concat!("sst/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if settings.insecure {
            tracing::warn!("TLS certificate validation is disabled");
        }

        Ok(Self {
            client,
            auto_post: settings.auto_post,
        })
    }

    async fn navigate(&self, request: reqwest::RequestBuilder) -> Result<Page, InteractionError> {
        let mut page = self.load(request).await?;

        if !self.auto_post {
            return Ok(page);
        }

        for _ in 0..MAX_AUTO_POST_HOPS {
            let Some(submission) = forms::auto_post(&page) else {
                return Ok(page);
            };
            tracing::debug!(action = %submission.action, "submitting auto-post form");
            page = self.load(self.request_for(&submission)).await?;
        }

        tracing::warn!(url = %page.url, "too many consecutive auto-post pages");
        Ok(page)
    }

    async fn load(&self, request: reqwest::RequestBuilder) -> Result<Page, InteractionError> {
        let response = request.send().await?;
        let url = response.url().clone();
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if status.is_client_error() || status.is_server_error() {
            return Err(InteractionError::Transport(format!("HTTP {status} from {url}")));
        }

        let body = response.text().await?;
        tracing::debug!(%url, status = status.as_u16(), "page loaded");
        tracing::trace!(%url, "{}", body);

        Ok(Page::new(url, status.as_u16(), content_type, body))
    }

    fn request_for(&self, submission: &FormSubmission) -> reqwest::RequestBuilder {
        match submission.method {
            FormMethod::Get => self.client.get(submission.target_url()),
            FormMethod::Post => self
                .client
                .post(submission.action.clone())
                .form(&submission.fields),
        }
    }
}

#[async_trait]
impl WebClient for HttpBrowser {
    async fn fetch(&self, url: &Url) -> Result<Page, InteractionError> {
        self.navigate(self.client.get(url.clone())).await
    }

    async fn submit_form(
        &self,
        page: &Page,
        selector: &str,
        values: &BTreeMap<String, String>,
        submit: Option<&str>,
    ) -> Result<Page, InteractionError> {
        let submission = forms::prepare_form(page, selector, values, submit)?;
        tracing::debug!(action = %submission.action, "submitting form '{}'", selector);
        self.navigate(self.request_for(&submission)).await
    }

    async fn click_link(&self, page: &Page, link: &LinkInteraction) -> Result<Page, InteractionError> {
        let target = forms::resolve_link(page, link)?;
        tracing::debug!(%target, "following {}", link.describe());
        self.navigate(self.client.get(target)).await
    }

    async fn click_element(&self, page: &Page, selector: &str) -> Result<Page, InteractionError> {
        match forms::activate(page, selector)? {
            Activation::Navigate(target) => self.navigate(self.client.get(target)).await,
            Activation::Submit(submission) => self.navigate(self.request_for(&submission)).await,
        }
    }
}
