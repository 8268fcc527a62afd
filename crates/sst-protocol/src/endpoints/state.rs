//! Capture endpoint state management.
//!
//! The capture slot is a one-shot handoff between the HTTP handler that
//! intercepts a message and the driver that started the round trip. Each
//! round trip arms the slot, which discards anything left over from the
//! previous one.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::types::CaptureOutcome;

#[derive(Debug, Default)]
struct SlotInner {
    round: u64,
    armed: bool,
    outcome: Option<CaptureOutcome>,
}

/// Single-writer, single-reader holding area for the intercepted message.
#[derive(Debug, Clone, Default)]
pub struct CaptureSlot {
    inner: Arc<Mutex<SlotInner>>,
    notify: Arc<Notify>,
}

impl CaptureSlot {
    /// Creates an empty, disarmed slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new round trip.
    ///
    /// Clears any previous outcome and returns the ticket the driver waits on.
    #[must_use]
    pub fn arm(&self) -> CaptureTicket {
        let mut inner = self.inner.lock();
        inner.round += 1;
        inner.armed = true;
        inner.outcome = None;
        tracing::debug!(round = inner.round, "capture slot armed");

        CaptureTicket {
            slot: self.clone(),
            round: inner.round,
        }
    }

    /// Publishes an outcome for the current round.
    ///
    /// Returns false if no round is armed, in which case the outcome is dropped.
    pub fn publish(&self, outcome: CaptureOutcome) -> bool {
        let mut inner = self.inner.lock();
        if !inner.armed {
            tracing::warn!(
                binding = %outcome.binding(),
                "message arrived with no round trip in progress, discarding"
            );
            return false;
        }

        if inner.outcome.is_some() {
            tracing::warn!(
                round = inner.round,
                binding = %outcome.binding(),
                "second message in the same round trip, replacing the first"
            );
        }
        inner.outcome = Some(outcome);
        drop(inner);

        self.notify.notify_waiters();
        true
    }

    /// Returns true while a round trip is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.inner.lock().armed
    }

    /// Returns true once the current round holds an outcome.
    #[must_use]
    pub fn has_outcome(&self) -> bool {
        self.inner.lock().outcome.is_some()
    }

    /// Returns a copy of the current outcome without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<CaptureOutcome> {
        self.inner.lock().outcome.clone()
    }

    fn take(&self, round: u64) -> Option<CaptureOutcome> {
        let mut inner = self.inner.lock();
        if inner.round != round {
            return None;
        }
        inner.armed = false;
        inner.outcome.take()
    }

    fn is_filled(&self, round: u64) -> bool {
        let inner = self.inner.lock();
        inner.round == round && inner.outcome.is_some()
    }
}

/// Handle for one armed round trip.
#[derive(Debug)]
pub struct CaptureTicket {
    slot: CaptureSlot,
    round: u64,
}

impl CaptureTicket {
    /// Returns the round number this ticket belongs to.
    #[must_use]
    pub const fn round(&self) -> u64 {
        self.round
    }

    /// Waits up to `grace` for an outcome, then consumes the slot.
    ///
    /// Returns immediately if the outcome was already published. The slot is
    /// disarmed whether or not anything arrived.
    pub async fn wait(self, grace: Duration) -> Option<CaptureOutcome> {
        let deadline = tokio::time::Instant::now() + grace;

        loop {
            let notified = self.slot.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.slot.is_filled(self.round) {
                break;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                break;
            }
        }

        let outcome = self.slot.take(self.round);
        if outcome.is_none() {
            tracing::debug!(round = self.round, "no message captured within grace period");
        }
        outcome
    }
}

/// State shared by the capture endpoint handlers.
#[derive(Debug, Clone)]
pub struct CaptureState {
    /// The slot the handlers publish into.
    pub slot: CaptureSlot,
}

impl CaptureState {
    /// Creates a new capture state publishing into `slot`.
    #[must_use]
    pub const fn new(slot: CaptureSlot) -> Self {
        Self { slot }
    }
}
