// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Consent Error Types
//!
//! Closed error taxonomy reported to the callback sink, plus the error type
//! returned by synchronous controller operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::session::SessionStatus;

/// Error codes reported to the callback sink.
///
/// Each code has a stable name, a stable numeric code and a default message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Host UI context unavailable when an operation required it.
    NullActivity,
    /// The consent service failed to begin listening.
    SmsRetrieverError,
    /// Unregistering a delivery handle that was already absent.
    NullBroadcastReceiver,
    /// A delivered event was malformed, unroutable, or its follow-up failed.
    CouldNotHandleBroadcast,
    /// The listening window elapsed with no matching SMS.
    ConsentTimeout,
    /// Registering the delivery handle failed.
    RegistrationError,
    /// The retry budget for starting the listener was exhausted.
    MaxRetriesReached,
    /// Catch-all for unclassified failures.
    UnknownError,
}

impl ErrorCode {
    /// All error codes, in numeric order.
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::NullActivity,
        ErrorCode::SmsRetrieverError,
        ErrorCode::NullBroadcastReceiver,
        ErrorCode::CouldNotHandleBroadcast,
        ErrorCode::RegistrationError,
        ErrorCode::MaxRetriesReached,
        ErrorCode::UnknownError,
        ErrorCode::ConsentTimeout,
    ];

    /// Stable symbolic name, e.g. `NULL_ACTIVITY`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NullActivity => "NULL_ACTIVITY",
            ErrorCode::SmsRetrieverError => "SMS_RETRIEVER_ERROR",
            ErrorCode::NullBroadcastReceiver => "NULL_BROADCAST_RECEIVER",
            ErrorCode::CouldNotHandleBroadcast => "COULD_NOT_HANDLE_BROADCAST",
            ErrorCode::ConsentTimeout => "CONSENT_TIMEOUT",
            ErrorCode::RegistrationError => "REGISTRATION_ERROR",
            ErrorCode::MaxRetriesReached => "MAX_RETRIES_REACHED",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Stable numeric code as reported to hosts.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::NullActivity => "1001",
            ErrorCode::SmsRetrieverError => "1002",
            ErrorCode::NullBroadcastReceiver => "1003",
            ErrorCode::CouldNotHandleBroadcast => "1004",
            ErrorCode::RegistrationError => "1005",
            ErrorCode::MaxRetriesReached => "1006",
            ErrorCode::UnknownError => "1007",
            ErrorCode::ConsentTimeout => "1008",
        }
    }

    /// Default human-readable message.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::NullActivity => "Activity is null",
            ErrorCode::SmsRetrieverError => "Failed to start SMS listener",
            ErrorCode::NullBroadcastReceiver => "Broadcast receiver is null",
            ErrorCode::CouldNotHandleBroadcast => "Could not handle broadcast",
            ErrorCode::ConsentTimeout => "SMS was not retrieved within the listening window",
            ErrorCode::RegistrationError => "Failed to register broadcast receiver",
            ErrorCode::MaxRetriesReached => "Maximum retry attempts reached",
            ErrorCode::UnknownError => "An unknown error occurred",
        }
    }

    /// Parses an error code from its symbolic name or numeric code.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s || code.code() == s)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported to the callback sink.
///
/// Constructed at the point of failure and never mutated afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ConsentError {
    code: ErrorCode,
    message: String,
}

impl ConsentError {
    /// Creates an error with a specific message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ConsentError {
            code,
            message: message.into(),
        }
    }

    /// Creates an error whose message is the code's default message followed
    /// by the underlying cause.
    pub fn with_cause(code: ErrorCode, cause: impl fmt::Display) -> Self {
        ConsentError::new(code, format!("{}: {}", code.message(), cause))
    }

    /// Returns the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ErrorCode> for ConsentError {
    fn from(code: ErrorCode) -> Self {
        ConsentError::new(code, code.message())
    }
}

/// Error returned by synchronous controller operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// A failure from the error taxonomy.
    #[error(transparent)]
    Consent(#[from] ConsentError),

    /// A listen session is already listening or awaiting consent.
    #[error("listen session already active: {0}")]
    SessionActive(SessionStatus),
}

impl ListenerError {
    /// Returns the error code this error is reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            ListenerError::Consent(e) => e.code(),
            ListenerError::SessionActive(_) => ErrorCode::UnknownError,
        }
    }

    /// Converts into the value handed to the callback sink.
    pub fn into_consent(self) -> ConsentError {
        match self {
            ListenerError::Consent(e) => e,
            other => ConsentError::new(ErrorCode::UnknownError, other.to_string()),
        }
    }
}

impl From<ErrorCode> for ListenerError {
    fn from(code: ErrorCode) -> Self {
        ListenerError::Consent(code.into())
    }
}

/// Result type for controller operations.
pub type ListenerResult<T> = Result<T, ListenerError>;
