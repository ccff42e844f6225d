// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! SMS Consent Listener
//!
//! Lifecycle control for the platform SMS user-consent API.
//!
//! # Overview
//!
//! One listen cycle looks like this:
//! - the controller asks the [`ConsentService`] to start watching for an SMS,
//!   retrying failed starts with exponential backoff and jitter
//! - once the service is listening, a [`ConsentBroadcastHandler`] is
//!   subscribed through [`BroadcastDelivery`] for the delivery window
//! - the handler turns the single delivered event into a [`ConsentOutcome`]
//! - the consent UI is launched, its result carries the SMS text
//! - the outcome reaches the [`CallbackSink`] and the cycle restarts
//!
//! All entry points take `&mut self` and are expected to run on the host's
//! owner thread. Asynchronous completions from the platform must be posted
//! back to that thread before they are handed to the controller.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use smsotp_core::consent::*;
//!
//! let mut controller = ConsentListenerController::new(
//!     service,
//!     delivery,
//!     scheduler,
//!     HostRef::from_arc(&host),
//!     Arc::downgrade(&sink),
//!     ConsentConfig::default(),
//! )
//! .with_launcher(launcher);
//!
//! controller.start()?;
//! // later, on the owner thread:
//! controller.on_listening_result(ticket, Ok(()));
//! controller.on_broadcast(subscription, &event);
//! controller.on_consent_result(ConsentResult::Approved { sms: Some(text) });
//! ```
//!
//! # Module Structure
//!
//! - [`error`] - Error codes and error types
//! - [`config`] - Retry policy and listener configuration
//! - [`session`] - Listen session state
//! - [`platform`] - Collaborator traits implemented by the host
//! - [`event`] - Delivered events and consent outcomes
//! - [`receiver`] - Single-shot broadcast handler
//! - [`controller`] - The lifecycle controller
//! - [`mock`] - Mock collaborators for testing

#[cfg(feature = "testing")]
pub mod config;
#[cfg(not(feature = "testing"))]
mod config;

#[cfg(feature = "testing")]
pub mod controller;
#[cfg(not(feature = "testing"))]
mod controller;

#[cfg(feature = "testing")]
pub mod error;
#[cfg(not(feature = "testing"))]
mod error;

#[cfg(feature = "testing")]
pub mod event;
#[cfg(not(feature = "testing"))]
mod event;

pub mod mock;

#[cfg(feature = "testing")]
pub mod platform;
#[cfg(not(feature = "testing"))]
mod platform;

#[cfg(feature = "testing")]
pub mod receiver;
#[cfg(not(feature = "testing"))]
mod receiver;

#[cfg(feature = "testing")]
pub mod session;
#[cfg(not(feature = "testing"))]
mod session;

// Error types
pub use error::{ConsentError, ErrorCode, ListenerError, ListenerResult};

// Configuration
pub use config::{ConsentConfig, RetryPolicy};

// Session state
pub use session::{ListenSession, SessionStatus};

// Collaborators
pub use platform::{
    BroadcastDelivery, CallbackSink, ConsentHandle, ConsentLauncher, ConsentService,
    DeliveryError, DeliveryFilter, HostContext, HostRef, LaunchError, RetryToken, Scheduler,
    ServiceError, StartTicket, SubscriptionId,
};

// Events
pub use event::{
    BroadcastEvent, ConsentOutcome, ConsentResult, EventPayload, StatusCode, SEND_PERMISSION,
    SMS_RETRIEVED_ACTION, STATUS_SUCCESS, STATUS_TIMEOUT,
};

// Broadcast handler
pub use receiver::{ConsentBroadcastHandler, ConsentDispatch};

// Controller
pub use controller::ConsentListenerController;

// Mock collaborators for testing
pub use mock::{
    ManualScheduler, MockConsentService, MockDelivery, MockHost, MockLauncher, RecordingSink,
    SinkRecord,
};
