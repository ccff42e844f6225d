// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mobile-friendly error types.

use smsotp_core::{ErrorCode, ListenerError};

/// Mobile-friendly error type.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MobileError {
    #[error("Activity is null: {0}")]
    NullActivity(String),

    #[error("SMS retriever error: {0}")]
    SmsRetrieverError(String),

    #[error("Broadcast receiver is null: {0}")]
    NullBroadcastReceiver(String),

    #[error("Could not handle broadcast: {0}")]
    CouldNotHandleBroadcast(String),

    #[error("Consent timeout: {0}")]
    ConsentTimeout(String),

    #[error("Registration error: {0}")]
    RegistrationError(String),

    #[error("Max retries reached: {0}")]
    MaxRetriesReached(String),

    #[error("Listener already active: {0}")]
    SessionActive(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl From<ListenerError> for MobileError {
    fn from(err: ListenerError) -> Self {
        let error = match err {
            ListenerError::SessionActive(status) => {
                return MobileError::SessionActive(status.to_string())
            }
            ListenerError::Consent(e) => e,
        };

        let message = error.message().to_string();
        match error.code() {
            ErrorCode::NullActivity => MobileError::NullActivity(message),
            ErrorCode::SmsRetrieverError => MobileError::SmsRetrieverError(message),
            ErrorCode::NullBroadcastReceiver => MobileError::NullBroadcastReceiver(message),
            ErrorCode::CouldNotHandleBroadcast => MobileError::CouldNotHandleBroadcast(message),
            ErrorCode::ConsentTimeout => MobileError::ConsentTimeout(message),
            ErrorCode::RegistrationError => MobileError::RegistrationError(message),
            ErrorCode::MaxRetriesReached => MobileError::MaxRetriesReached(message),
            ErrorCode::UnknownError => MobileError::UnknownError(message),
        }
    }
}
