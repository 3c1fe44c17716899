//! Autosave scheduling
//!
//! Edits arm a single deadline; arming again replaces it, so a burst of edits
//! closer together than the delay produces one save. The scheduler only
//! tracks time. The buffer is read when the deadline fires, never captured
//! at arm time.

use std::time::{Duration, Instant};

use crate::gateway::DocumentTarget;

/// Default quiescence window before an autosave fires
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;

/// A save waiting for its deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    /// Document the edit was made to
    pub target: DocumentTarget,
    /// Buffer revision of the edit that armed the timer
    pub revision: u64,
    pub deadline: Instant,
}

/// Cancel-and-rearm debounce timer
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    delay: Duration,
    pending: Option<PendingSave>,
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_AUTOSAVE_DELAY_MS))
    }
}

impl AutosaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer for an edit made at `now`
    pub fn arm(&mut self, target: DocumentTarget, revision: u64, now: Instant) {
        if let Some(previous) = &self.pending {
            tracing::trace!(revision = previous.revision, "autosave re-armed");
        }
        self.pending = Some(PendingSave {
            target,
            revision,
            deadline: now + self.delay,
        });
    }

    /// Drop any pending save, returning it
    pub fn cancel(&mut self) -> Option<PendingSave> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&PendingSave> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending save fires
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.deadline.saturating_duration_since(now))
    }

    /// Take the pending save if its deadline has passed. Fires at most once
    /// per arming.
    pub fn poll(&mut self, now: Instant) -> Option<PendingSave> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take(),
            _ => None,
        }
    }
}
