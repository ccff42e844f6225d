// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Listen Session
//!
//! State of one attempt to watch for an SMS.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a listen session.
///
/// `Idle -> Starting -> Listening -> AwaitingConsent -> {Completed | Failed} -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No listener running.
    #[default]
    Idle,
    /// Waiting for the consent service to start listening (possibly retrying).
    Starting,
    /// Broadcast handler registered, waiting for a delivery.
    Listening,
    /// Consent UI launched, waiting for the user's decision.
    AwaitingConsent,
    /// An SMS was delivered to the sink.
    Completed,
    /// The session ended with an error.
    Failed,
}

impl SessionStatus {
    fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Starting => "starting",
            SessionStatus::Listening => "listening",
            SessionStatus::AwaitingConsent => "awaiting_consent",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attempt to watch for an SMS.
///
/// Owned by the controller and mutated only through its transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenSession {
    retry_count: u32,
    status: SessionStatus,
}

impl ListenSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns how many start retries have been scheduled this cycle.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Returns true while listening or awaiting consent.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            SessionStatus::Listening | SessionStatus::AwaitingConsent
        )
    }

    /// Idle -> Starting.
    pub(crate) fn begin(&mut self) {
        self.retry_count = 0;
        self.status = SessionStatus::Starting;
    }

    /// Starting -> Starting via the retry edge.
    pub(crate) fn record_retry(&mut self) {
        self.retry_count += 1;
    }

    /// Starting -> Listening.
    pub(crate) fn listening(&mut self) {
        self.retry_count = 0;
        self.status = SessionStatus::Listening;
    }

    /// Listening -> AwaitingConsent.
    pub(crate) fn await_consent(&mut self) {
        self.status = SessionStatus::AwaitingConsent;
    }

    pub(crate) fn complete(&mut self) {
        self.status = SessionStatus::Completed;
    }

    pub(crate) fn fail(&mut self) {
        self.status = SessionStatus::Failed;
    }

    /// Resets to Idle.
    pub(crate) fn settle(&mut self) {
        *self = ListenSession::default();
    }
}

// INLINE_TEST_REQUIRED: Transitions are crate-private
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = ListenSession::new();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.retry_count(), 0);
        assert!(!session.is_active());
    }

    #[test]
    fn test_full_cycle() {
        let mut session = ListenSession::new();

        session.begin();
        assert_eq!(session.status(), SessionStatus::Starting);
        assert!(!session.is_active());

        session.record_retry();
        session.record_retry();
        assert_eq!(session.retry_count(), 2);

        session.listening();
        assert_eq!(session.status(), SessionStatus::Listening);
        assert_eq!(session.retry_count(), 0);
        assert!(session.is_active());

        session.await_consent();
        assert!(session.is_active());

        session.complete();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert!(!session.is_active());

        session.settle();
        assert_eq!(session, ListenSession::new());
    }

    #[test]
    fn test_begin_resets_retry_count() {
        let mut session = ListenSession::new();
        session.begin();
        session.record_retry();
        session.fail();

        session.begin();
        assert_eq!(session.retry_count(), 0);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SessionStatus::AwaitingConsent.to_string(), "awaiting_consent");
        assert_eq!(SessionStatus::Idle.to_string(), "idle");
    }
}
