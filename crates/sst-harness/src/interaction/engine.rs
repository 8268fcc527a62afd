//! Interaction replay.

use url::Url;

use super::{Interaction, Page, WebClient};
use crate::error::InteractionError;

/// Why a replay stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// Every interaction was applied.
    Completed,
    /// The page reached before interaction `step` (zero-based) cannot be
    /// interacted with. This is the normal end once the target has sent its
    /// message to the capture endpoint.
    NonInteractivePage {
        /// Index of the interaction that was not attempted.
        step: usize,
    },
    /// The target delivered its message before interaction `step`
    /// (zero-based); the remaining interactions were not attempted.
    MessageSent {
        /// Index of the interaction that was not attempted.
        step: usize,
    },
    /// Interaction `step` (zero-based) failed.
    Failed {
        /// Index of the failing interaction.
        step: usize,
        /// The failure.
        error: InteractionError,
    },
}

/// Outcome of replaying a scripted login flow.
#[derive(Debug, Clone)]
pub struct Replay {
    /// The last page successfully reached.
    pub page: Page,
    /// Number of interactions applied.
    pub steps_completed: usize,
    /// Why the replay stopped.
    pub halt: HaltReason,
}

impl Replay {
    /// Returns the failure that stopped the replay, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&InteractionError> {
        match &self.halt {
            HaltReason::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Replays scripted interactions in order against a [`WebClient`].
///
/// The sequence is linear: no branching, no retries.
pub struct InteractionEngine;

impl InteractionEngine {
    /// Fetches `start_url` and applies `interactions` in order.
    ///
    /// Fails only if the start page itself cannot be fetched; later failures
    /// are reported through [`Replay::halt`] together with the last page reached.
    pub async fn replay<C>(
        client: &C,
        start_url: &Url,
        interactions: &[Interaction],
    ) -> Result<Replay, InteractionError>
    where
        C: WebClient + ?Sized,
    {
        Self::replay_until(client, start_url, interactions, || false).await
    }

    /// Like [`replay`](Self::replay), but stops before the next interaction
    /// as soon as `message_sent` returns true.
    pub async fn replay_until<C, F>(
        client: &C,
        start_url: &Url,
        interactions: &[Interaction],
        message_sent: F,
    ) -> Result<Replay, InteractionError>
    where
        C: WebClient + ?Sized,
        F: Fn() -> bool + Send,
    {
        tracing::debug!(%start_url, steps = interactions.len(), "starting interaction replay");
        let mut page = client.fetch(start_url).await?;

        for (step, interaction) in interactions.iter().enumerate() {
            if message_sent() {
                tracing::debug!(step, url = %page.url, "message already sent, stopping replay");
                return Ok(Replay {
                    page,
                    steps_completed: step,
                    halt: HaltReason::MessageSent { step },
                });
            }

            if !page.is_interactive() {
                tracing::debug!(
                    step,
                    url = %page.url,
                    content_type = page.content_type.as_deref().unwrap_or("none"),
                    "page is not interactive, stopping replay"
                );
                return Ok(Replay {
                    page,
                    steps_completed: step,
                    halt: HaltReason::NonInteractivePage { step },
                });
            }

            tracing::debug!(step, kind = interaction.kind(), url = %page.url, "applying interaction");
            let next = match interaction {
                Interaction::Form(form) => {
                    client
                        .submit_form(&page, &form.selector, &form.values, form.submit.as_deref())
                        .await
                }
                Interaction::Link(link) => client.click_link(&page, link).await,
                Interaction::Generic(element) => client.click_element(&page, &element.selector).await,
            };

            match next {
                Ok(next) => page = next,
                Err(error) => {
                    tracing::warn!(step, kind = interaction.kind(), "interaction failed: {}", error);
                    return Ok(Replay {
                        page,
                        steps_completed: step,
                        halt: HaltReason::Failed { step, error },
                    });
                }
            }
        }

        Ok(Replay {
            page,
            steps_completed: interactions.len(),
            halt: HaltReason::Completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sst_protocol::endpoints::CaptureSlot;
    use sst_protocol::{CaptureOutcome, CapturedMessage, SamlBinding};

    use super::*;
    use crate::interaction::fake::{html, url, FakeClient};
    use crate::interaction::{ElementInteraction, FormInteraction, LinkInteraction};

    fn form(selector: &str) -> Interaction {
        Interaction::Form(FormInteraction {
            selector: selector.to_string(),
            values: BTreeMap::new(),
            submit: None,
        })
    }

    fn link(selector: &str) -> Interaction {
        Interaction::Link(LinkInteraction {
            selector: Some(selector.to_string()),
            text_contains: None,
        })
    }

    #[tokio::test]
    async fn zero_interactions_return_start_page() {
        let start = html("https://idp.test/login");
        let client = FakeClient::default().with_page("fetch https://idp.test/login", start.clone());

        let replay = InteractionEngine::replay(&client, &url("https://idp.test/login"), &[])
            .await
            .unwrap();

        assert_eq!(replay.page, start);
        assert_eq!(replay.steps_completed, 0);
        assert_eq!(replay.halt, HaltReason::Completed);
    }

    #[tokio::test]
    async fn stops_at_non_interactive_page() {
        let final_page = Page::new(url("https://sp.test/sso"), 200, Some("application/json".into()), "{}");
        let client = FakeClient::default()
            .with_page("fetch https://idp.test/login", html("https://idp.test/login"))
            .with_page("form #login", final_page.clone())
            .with_page("link #next", html("https://idp.test/next"));

        let replay = InteractionEngine::replay(
            &client,
            &url("https://idp.test/login"),
            &[form("#login"), link("#next")],
        )
        .await
        .unwrap();

        assert_eq!(replay.page, final_page);
        assert_eq!(replay.steps_completed, 1);
        assert_eq!(replay.halt, HaltReason::NonInteractivePage { step: 1 });
        assert_eq!(
            *client.calls.lock(),
            vec!["fetch https://idp.test/login".to_string(), "form #login".to_string()]
        );
    }

    #[tokio::test]
    async fn applies_all_kinds_in_order() {
        let client = FakeClient::default()
            .with_page("fetch https://idp.test/", html("https://idp.test/"))
            .with_page("link #start", html("https://idp.test/a"))
            .with_page("form #login", html("https://idp.test/b"))
            .with_page("element #consent", html("https://idp.test/c"));

        let interactions = [
            link("#start"),
            form("#login"),
            Interaction::Generic(ElementInteraction {
                selector: "#consent".to_string(),
            }),
        ];
        let replay = InteractionEngine::replay(&client, &url("https://idp.test/"), &interactions)
            .await
            .unwrap();

        assert_eq!(replay.page.url.as_str(), "https://idp.test/c");
        assert_eq!(replay.steps_completed, 3);
        assert_eq!(replay.halt, HaltReason::Completed);
    }

    #[tokio::test]
    async fn failure_keeps_last_page() {
        let client = FakeClient::default()
            .with_page("fetch https://idp.test/", html("https://idp.test/"))
            .with_page("form #login", html("https://idp.test/after-login"));

        let replay = InteractionEngine::replay(
            &client,
            &url("https://idp.test/"),
            &[form("#login"), link("#missing"), form("#never")],
        )
        .await
        .unwrap();

        assert_eq!(replay.page.url.as_str(), "https://idp.test/after-login");
        assert_eq!(replay.steps_completed, 1);
        assert!(matches!(
            replay.error(),
            Some(InteractionError::NotFound(key)) if key == "link #missing"
        ));
        assert!(!client.calls.lock().iter().any(|c| c == "form #never"));
    }

    #[tokio::test]
    async fn stops_once_message_is_sent() {
        let slot = CaptureSlot::new();
        let _ticket = slot.arm();
        let captured = CaptureOutcome::Captured(CapturedMessage::new("<Response/>", SamlBinding::HttpPost));
        let client = FakeClient::default()
            .with_page("fetch https://idp.test/login", html("https://idp.test/login"))
            .with_capture("form #login", &slot, captured)
            .with_page("form #login", html("https://sp.test/sso"))
            .with_page("link #next", html("https://idp.test/next"));

        let replay = InteractionEngine::replay_until(
            &client,
            &url("https://idp.test/login"),
            &[form("#login"), link("#next")],
            || slot.has_outcome(),
        )
        .await
        .unwrap();

        assert_eq!(replay.page.url.as_str(), "https://sp.test/sso");
        assert_eq!(replay.steps_completed, 1);
        assert_eq!(replay.halt, HaltReason::MessageSent { step: 1 });
        assert!(replay.error().is_none());
        assert!(!client.calls.lock().iter().any(|c| c == "link #next"));
    }

    #[tokio::test]
    async fn unreachable_start_page_is_an_error() {
        let client = FakeClient::default();
        let result = InteractionEngine::replay(&client, &url("https://idp.test/"), &[]).await;
        assert!(result.is_err());
    }
}
