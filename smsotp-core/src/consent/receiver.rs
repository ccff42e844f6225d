// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Consent Broadcast Handler
//!
//! Turns the event delivered to one subscription into exactly one outcome.

use tracing::{debug, error, info, warn};

use super::error::{ConsentError, ErrorCode};
use super::event::{BroadcastEvent, ConsentOutcome, StatusCode};
use super::platform::{ConsentHandle, HostRef, LaunchError, SubscriptionId};

/// Operations the handler dispatches outcomes into.
///
/// Implemented by [`ConsentListenerController`](super::ConsentListenerController).
pub trait ConsentDispatch {
    /// Launches the consent UI for `handle`.
    fn start_consent_intent(&mut self, handle: ConsentHandle) -> Result<(), LaunchError>;

    /// Reports a terminal error for the session.
    fn handle_error(&mut self, error: ConsentError);
}

/// Single-shot adapter bound to one delivery subscription.
#[derive(Debug, Clone)]
pub struct ConsentBroadcastHandler {
    subscription: SubscriptionId,
    action: String,
    host: HostRef,
    spent: bool,
}

impl ConsentBroadcastHandler {
    /// Creates a handler for `subscription` accepting events with `action`.
    pub fn new(subscription: SubscriptionId, action: impl Into<String>, host: HostRef) -> Self {
        ConsentBroadcastHandler {
            subscription,
            action: action.into(),
            host,
            spent: false,
        }
    }

    /// Subscription this handler is bound to.
    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    /// Returns true once an outcome has been produced.
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Validates a delivered event.
    ///
    /// Returns `None` for unrelated events and for anything delivered after
    /// the first outcome. Otherwise the handler is spent.
    pub fn receive(&mut self, event: &BroadcastEvent) -> Option<ConsentOutcome> {
        if event.action != self.action {
            debug!(
                subscription = %self.subscription,
                action = %event.action,
                "Ignoring event with different action"
            );
            return None;
        }

        if self.spent {
            warn!(
                subscription = %self.subscription,
                "Ignoring event delivered after the outcome was produced"
            );
            return None;
        }
        self.spent = true;

        Some(Self::validate(event))
    }

    fn validate(event: &BroadcastEvent) -> ConsentOutcome {
        let Some(extras) = event.extras() else {
            error!("Intent extras are null");
            return ConsentOutcome::MalformedEvent("Intent extras are null".into());
        };

        let Some(raw_status) = extras.status else {
            error!("SMS retriever status is null");
            return ConsentOutcome::MalformedEvent("SMS retriever status is null".into());
        };

        let Some(handle) = extras.consent_handle.clone() else {
            error!("Consent intent is null");
            return ConsentOutcome::MalformedEvent("Consent intent is null".into());
        };

        match StatusCode::from_raw(raw_status) {
            StatusCode::Success => ConsentOutcome::Success(handle),
            StatusCode::Timeout => ConsentOutcome::Timeout,
            StatusCode::Unknown(code) => {
                error!(code, "Unknown status code");
                ConsentOutcome::MalformedEvent(format!("Unknown status code: {}", code))
            }
        }
    }

    /// Forwards an outcome to `target`.
    pub fn dispatch<D: ConsentDispatch + ?Sized>(&self, outcome: ConsentOutcome, target: &mut D) {
        match outcome {
            ConsentOutcome::Success(handle) => {
                if !self.host.is_live() {
                    error!("Host is gone or finishing, cannot launch consent UI");
                    target.handle_error(ConsentError::new(
                        ErrorCode::CouldNotHandleBroadcast,
                        "Activity is not available",
                    ));
                    return;
                }

                debug!(handle = %handle, "Starting consent intent with launcher");
                match target.start_consent_intent(handle) {
                    Ok(()) => info!("Consent intent started"),
                    Err(e) => {
                        error!(error = %e, "Failed to launch consent UI");
                        target.handle_error(ConsentError::new(
                            ErrorCode::CouldNotHandleBroadcast,
                            e.to_string(),
                        ));
                    }
                }
            }
            ConsentOutcome::Timeout => {
                warn!("SMS retrieval timed out");
                target.handle_error(ErrorCode::ConsentTimeout.into());
            }
            ConsentOutcome::MalformedEvent(reason) => {
                target.handle_error(ConsentError::new(
                    ErrorCode::CouldNotHandleBroadcast,
                    reason,
                ));
            }
        }
    }
}
