// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! smsotp Core Library
//!
//! Consent-based retrieval of SMS one-time passcodes for phone-number
//! verification. The host platform supplies the consent service, the
//! broadcast delivery mechanism and the consent UI; this crate owns the
//! listener lifecycle around them.

pub mod consent;
pub mod otp;

pub use consent::{
    BroadcastDelivery, BroadcastEvent, CallbackSink, ConsentBroadcastHandler, ConsentConfig,
    ConsentError, ConsentHandle, ConsentLauncher, ConsentListenerController, ConsentOutcome,
    ConsentResult, ConsentService, DeliveryError, DeliveryFilter, ErrorCode, EventPayload,
    HostContext, HostRef, LaunchError, ListenSession, ListenerError, ListenerResult, RetryPolicy,
    RetryToken, Scheduler, ServiceError, SessionStatus, StartTicket, StatusCode, SubscriptionId,
};
pub use otp::{is_valid_otp, OtpExtractor, DEFAULT_OTP_LENGTH};
