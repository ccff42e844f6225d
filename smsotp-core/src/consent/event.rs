// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Delivered events and consent outcomes.

use super::platform::ConsentHandle;

/// Action carried by the platform's SMS-retrieved event.
pub const SMS_RETRIEVED_ACTION: &str = "com.google.android.gms.auth.api.phone.SMS_RETRIEVED";

/// Permission held by the platform service that sends the event.
pub const SEND_PERMISSION: &str = "com.google.android.gms.auth.api.phone.permission.SEND";

/// Raw status code for a successful retrieval.
pub const STATUS_SUCCESS: i32 = 0;

/// Raw status code for an elapsed listening window.
pub const STATUS_TIMEOUT: i32 = 15;

/// Status reported in a delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Success,
    Timeout,
    Unknown(i32),
}

impl StatusCode {
    /// Maps a raw platform status code.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            STATUS_SUCCESS => StatusCode::Success,
            STATUS_TIMEOUT => StatusCode::Timeout,
            other => StatusCode::Unknown(other),
        }
    }
}

/// Extras attached to a delivered event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPayload {
    /// Raw status code.
    pub status: Option<i32>,
    /// Handle to the consent UI.
    pub consent_handle: Option<ConsentHandle>,
}

impl EventPayload {
    /// Payload for a successful retrieval.
    pub fn success(handle: ConsentHandle) -> Self {
        EventPayload {
            status: Some(STATUS_SUCCESS),
            consent_handle: Some(handle),
        }
    }

    /// Returns true if the payload carries nothing.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.consent_handle.is_none()
    }
}

/// An event delivered to a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastEvent {
    /// Event action.
    pub action: String,
    /// Event extras, if any.
    pub payload: Option<EventPayload>,
}

impl BroadcastEvent {
    /// Creates an event.
    pub fn new(action: impl Into<String>, payload: Option<EventPayload>) -> Self {
        BroadcastEvent {
            action: action.into(),
            payload,
        }
    }

    /// An SMS-retrieved event with the given payload.
    pub fn sms_retrieved(payload: Option<EventPayload>) -> Self {
        BroadcastEvent::new(SMS_RETRIEVED_ACTION, payload)
    }

    /// Returns the payload, treating an empty payload as absent.
    pub fn extras(&self) -> Option<&EventPayload> {
        self.payload.as_ref().filter(|payload| !payload.is_empty())
    }
}

/// The single terminal result of one delivery window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentOutcome {
    /// A matching SMS arrived; the user must approve it through the consent UI.
    Success(ConsentHandle),
    /// The listening window elapsed.
    Timeout,
    /// The event could not be interpreted.
    MalformedEvent(String),
}

/// Result of the consent UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentResult {
    /// The user agreed to share the message.
    Approved {
        /// The SMS text, if the platform returned it.
        sms: Option<String>,
    },
    /// The user declined or dismissed the consent UI.
    Denied,
}
