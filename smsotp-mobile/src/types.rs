// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mobile-friendly data types.
//!
//! These types are wrappers around smsotp-core types that are compatible
//! with UniFFI for cross-language bindings.

use smsotp_core::{
    BroadcastEvent, ConsentConfig, ConsentHandle, ErrorCode, EventPayload, LaunchError,
    RetryPolicy, SessionStatus,
};

/// Mobile-friendly error code enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum MobileErrorCode {
    NullActivity,
    SmsRetrieverError,
    NullBroadcastReceiver,
    CouldNotHandleBroadcast,
    ConsentTimeout,
    RegistrationError,
    MaxRetriesReached,
    UnknownError,
}

impl From<ErrorCode> for MobileErrorCode {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::NullActivity => MobileErrorCode::NullActivity,
            ErrorCode::SmsRetrieverError => MobileErrorCode::SmsRetrieverError,
            ErrorCode::NullBroadcastReceiver => MobileErrorCode::NullBroadcastReceiver,
            ErrorCode::CouldNotHandleBroadcast => MobileErrorCode::CouldNotHandleBroadcast,
            ErrorCode::ConsentTimeout => MobileErrorCode::ConsentTimeout,
            ErrorCode::RegistrationError => MobileErrorCode::RegistrationError,
            ErrorCode::MaxRetriesReached => MobileErrorCode::MaxRetriesReached,
            ErrorCode::UnknownError => MobileErrorCode::UnknownError,
        }
    }
}

impl From<MobileErrorCode> for ErrorCode {
    fn from(code: MobileErrorCode) -> Self {
        match code {
            MobileErrorCode::NullActivity => ErrorCode::NullActivity,
            MobileErrorCode::SmsRetrieverError => ErrorCode::SmsRetrieverError,
            MobileErrorCode::NullBroadcastReceiver => ErrorCode::NullBroadcastReceiver,
            MobileErrorCode::CouldNotHandleBroadcast => ErrorCode::CouldNotHandleBroadcast,
            MobileErrorCode::ConsentTimeout => ErrorCode::ConsentTimeout,
            MobileErrorCode::RegistrationError => ErrorCode::RegistrationError,
            MobileErrorCode::MaxRetriesReached => ErrorCode::MaxRetriesReached,
            MobileErrorCode::UnknownError => ErrorCode::UnknownError,
        }
    }
}

/// Mobile-friendly session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum MobileSessionStatus {
    Idle,
    Starting,
    Listening,
    AwaitingConsent,
    Completed,
    Failed,
}

impl From<SessionStatus> for MobileSessionStatus {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Idle => MobileSessionStatus::Idle,
            SessionStatus::Starting => MobileSessionStatus::Starting,
            SessionStatus::Listening => MobileSessionStatus::Listening,
            SessionStatus::AwaitingConsent => MobileSessionStatus::AwaitingConsent,
            SessionStatus::Completed => MobileSessionStatus::Completed,
            SessionStatus::Failed => MobileSessionStatus::Failed,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, uniffi::Record)]
pub struct MobileConsentConfig {
    /// Maximum listener start retries per cycle.
    pub max_retries: u32,
    /// Delay before the first retry (milliseconds).
    pub initial_delay_ms: u64,
    /// Cap on the exponential delay (milliseconds).
    pub max_delay_ms: u64,
    /// Random jitter added to each delay (milliseconds).
    pub jitter_ms: u64,
    /// Restarts allowed in a row without a successful registration.
    pub max_unproductive_restarts: u32,
}

impl Default for MobileConsentConfig {
    fn default() -> Self {
        ConsentConfig::default().into()
    }
}

impl From<ConsentConfig> for MobileConsentConfig {
    fn from(config: ConsentConfig) -> Self {
        MobileConsentConfig {
            max_retries: config.retry.max_retries,
            initial_delay_ms: config.retry.initial_delay_ms,
            max_delay_ms: config.retry.max_delay_ms,
            jitter_ms: config.retry.jitter_ms,
            max_unproductive_restarts: config.max_unproductive_restarts,
        }
    }
}

impl From<MobileConsentConfig> for ConsentConfig {
    fn from(config: MobileConsentConfig) -> Self {
        ConsentConfig {
            retry: RetryPolicy {
                max_retries: config.max_retries,
                initial_delay_ms: config.initial_delay_ms,
                max_delay_ms: config.max_delay_ms,
                jitter_ms: config.jitter_ms,
            },
            max_unproductive_restarts: config.max_unproductive_restarts,
            ..ConsentConfig::default()
        }
    }
}

/// Extras of a delivered event.
#[derive(Debug, Clone, uniffi::Record)]
pub struct MobileEventExtras {
    /// Raw platform status code.
    pub status: Option<i32>,
    /// Platform handle to the consent UI.
    pub consent_handle: Option<String>,
}

/// An event delivered to a registered receiver.
#[derive(Debug, Clone, uniffi::Record)]
pub struct MobileBroadcastEvent {
    pub action: String,
    pub extras: Option<MobileEventExtras>,
}

impl From<MobileBroadcastEvent> for BroadcastEvent {
    fn from(event: MobileBroadcastEvent) -> Self {
        let payload = event.extras.map(|extras| EventPayload {
            status: extras.status,
            consent_handle: extras.consent_handle.map(ConsentHandle::new),
        });
        BroadcastEvent::new(event.action, payload)
    }
}

/// Result of registering a broadcast receiver.
#[derive(Debug, Clone, uniffi::Record)]
pub struct MobileRegistration {
    /// Handle used to unregister and to tag deliveries.
    pub subscription_id: u64,
    /// Error message if registration failed, empty otherwise.
    pub error: String,
}

/// Result of launching the consent UI.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum MobileLaunchResult {
    Launched,
    TargetNotFound { message: String },
    PermissionDenied { message: String },
    InvalidHostState { message: String },
    Failed { message: String },
}

impl MobileLaunchResult {
    pub(crate) fn into_result(self) -> Result<(), LaunchError> {
        match self {
            MobileLaunchResult::Launched => Ok(()),
            MobileLaunchResult::TargetNotFound { message } => {
                Err(LaunchError::TargetNotFound(message))
            }
            MobileLaunchResult::PermissionDenied { message } => {
                Err(LaunchError::PermissionDenied(message))
            }
            MobileLaunchResult::InvalidHostState { message } => {
                Err(LaunchError::InvalidHostState(message))
            }
            MobileLaunchResult::Failed { message } => Err(LaunchError::Other(message)),
        }
    }
}
