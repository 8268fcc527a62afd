//! In-memory web client for tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use sst_protocol::endpoints::CaptureSlot;
use sst_protocol::CaptureOutcome;
use url::Url;

use super::{LinkInteraction, Page, WebClient};
use crate::error::InteractionError;

/// In-memory client: every navigation moves to a scripted page.
#[derive(Default)]
pub(crate) struct FakeClient {
    pages: HashMap<String, Page>,
    captures: HashMap<String, (CaptureSlot, CaptureOutcome)>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeClient {
    pub(crate) fn with_page(mut self, key: &str, page: Page) -> Self {
        self.pages.insert(key.to_string(), page);
        self
    }

    /// Publishes `outcome` into `slot` when navigation `key` happens, like
    /// a redirect chain passing through the capture endpoint.
    pub(crate) fn with_capture(mut self, key: &str, slot: &CaptureSlot, outcome: CaptureOutcome) -> Self {
        self.captures.insert(key.to_string(), (slot.clone(), outcome));
        self
    }

    fn go(&self, key: String) -> Result<Page, InteractionError> {
        self.calls.lock().push(key.clone());
        if let Some((slot, outcome)) = self.captures.get(&key) {
            slot.publish(outcome.clone());
        }
        self.pages
            .get(&key)
            .cloned()
            .ok_or(InteractionError::NotFound(key))
    }
}

#[async_trait]
impl WebClient for FakeClient {
    async fn fetch(&self, url: &Url) -> Result<Page, InteractionError> {
        self.go(format!("fetch {url}"))
    }

    async fn submit_form(
        &self,
        _page: &Page,
        selector: &str,
        _values: &BTreeMap<String, String>,
        _submit: Option<&str>,
    ) -> Result<Page, InteractionError> {
        self.go(format!("form {selector}"))
    }

    async fn click_link(&self, _page: &Page, link: &LinkInteraction) -> Result<Page, InteractionError> {
        self.go(format!("link {}", link.selector.as_deref().unwrap_or_default()))
    }

    async fn click_element(&self, _page: &Page, selector: &str) -> Result<Page, InteractionError> {
        self.go(format!("element {selector}"))
    }
}

pub(crate) fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

pub(crate) fn html(s: &str) -> Page {
    Page::html(url(s), "<html><body></body></html>")
}
