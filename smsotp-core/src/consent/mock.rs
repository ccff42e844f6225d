// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Collaborators
//!
//! In-memory implementations of the platform traits for testing. Each mock
//! records what the controller asked of it so tests can drive completions by
//! hand on the test thread.
//!
//! # Example
//!
//! ```ignore
//! use smsotp_core::consent::*;
//!
//! let host = MockHost::live();
//! let sink = RecordingSink::new();
//! let mut controller = ConsentListenerController::new(
//!     MockConsentService::new(),
//!     MockDelivery::new(),
//!     ManualScheduler::new(),
//!     HostRef::from_arc(&host),
//!     Arc::downgrade(&sink),
//!     ConsentConfig::default(),
//! );
//!
//! controller.start().unwrap();
//! let ticket = controller.service().last_ticket().unwrap();
//! controller.on_listening_result(ticket, Ok(()));
//! assert_eq!(controller.delivery().active_count(), 1);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::ErrorCode;
use super::platform::{
    BroadcastDelivery, CallbackSink, ConsentHandle, ConsentLauncher, ConsentService,
    DeliveryError, DeliveryFilter, HostContext, LaunchError, RetryToken, Scheduler, ServiceError,
    StartTicket, SubscriptionId,
};

/// Host whose liveness can be toggled.
#[derive(Debug)]
pub struct MockHost {
    live: AtomicBool,
}

impl MockHost {
    /// Creates a live host.
    pub fn live() -> Arc<Self> {
        Arc::new(MockHost {
            live: AtomicBool::new(true),
        })
    }

    /// Marks the host as finishing.
    pub fn finish(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

impl HostContext for MockHost {
    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// A notification received by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkRecord {
    Sms(String),
    Error { code: ErrorCode, message: String },
}

/// Sink that records every notification.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<SinkRecord>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingSink::default())
    }

    /// All notifications in order.
    pub fn records(&self) -> Vec<SinkRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Delivered SMS texts in order.
    pub fn sms(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter_map(|r| match r {
                SinkRecord::Sms(text) => Some(text),
                SinkRecord::Error { .. } => None,
            })
            .collect()
    }

    /// Delivered errors in order.
    pub fn errors(&self) -> Vec<(ErrorCode, String)> {
        self.records()
            .into_iter()
            .filter_map(|r| match r {
                SinkRecord::Error { code, message } => Some((code, message)),
                SinkRecord::Sms(_) => None,
            })
            .collect()
    }

    /// Delivered error codes in order.
    pub fn error_codes(&self) -> Vec<ErrorCode> {
        self.errors().into_iter().map(|(code, _)| code).collect()
    }

    /// Number of notifications.
    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl CallbackSink for RecordingSink {
    fn on_sms_received(&self, sms: &str) {
        self.records
            .lock()
            .unwrap()
            .push(SinkRecord::Sms(sms.to_string()));
    }

    fn on_error(&self, code: ErrorCode, message: &str) {
        self.records.lock().unwrap().push(SinkRecord::Error {
            code,
            message: message.to_string(),
        });
    }
}

/// Consent service that records start requests.
#[derive(Debug, Default)]
pub struct MockConsentService {
    tickets: Vec<StartTicket>,
    refuse: Option<ServiceError>,
}

impl MockConsentService {
    /// Creates a service that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following request fail synchronously (or succeed again with `None`).
    pub fn refuse_with(&mut self, error: Option<ServiceError>) {
        self.refuse = error;
    }

    /// Tickets of all accepted requests.
    pub fn tickets(&self) -> &[StartTicket] {
        &self.tickets
    }

    /// Ticket of the most recent accepted request.
    pub fn last_ticket(&self) -> Option<StartTicket> {
        self.tickets.last().copied()
    }

    /// Number of accepted requests.
    pub fn start_count(&self) -> usize {
        self.tickets.len()
    }
}

impl ConsentService for MockConsentService {
    fn start_listening(
        &mut self,
        _host: &dyn HostContext,
        ticket: StartTicket,
    ) -> Result<(), ServiceError> {
        if let Some(error) = &self.refuse {
            return Err(error.clone());
        }
        self.tickets.push(ticket);
        Ok(())
    }
}

/// Delivery mechanism that tracks active subscriptions.
#[derive(Debug, Default)]
pub struct MockDelivery {
    next_id: u64,
    active: Vec<(SubscriptionId, DeliveryFilter)>,
    subscribe_count: usize,
    unsubscribed: Vec<SubscriptionId>,
    fail_subscribe: bool,
}

impl MockDelivery {
    /// Creates a delivery mechanism with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subscribe fail.
    pub fn fail_subscribe(&mut self, fail: bool) {
        self.fail_subscribe = fail;
    }

    /// Removes a subscription behind the controller's back.
    pub fn drop_subscription(&mut self, id: SubscriptionId) {
        self.active.retain(|(active, _)| *active != id);
    }

    /// Currently registered subscriptions.
    pub fn active_subscriptions(&self) -> Vec<SubscriptionId> {
        self.active.iter().map(|(id, _)| *id).collect()
    }

    /// Number of currently registered subscriptions.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Filter of a registered subscription.
    pub fn filter(&self, id: SubscriptionId) -> Option<&DeliveryFilter> {
        self.active
            .iter()
            .find(|(active, _)| *active == id)
            .map(|(_, filter)| filter)
    }

    /// Number of successful subscribe calls.
    pub fn subscribe_count(&self) -> usize {
        self.subscribe_count
    }

    /// Subscriptions removed through unsubscribe, in order.
    pub fn unsubscribed(&self) -> &[SubscriptionId] {
        &self.unsubscribed
    }
}

impl BroadcastDelivery for MockDelivery {
    fn subscribe(
        &mut self,
        _host: &dyn HostContext,
        filter: &DeliveryFilter,
    ) -> Result<SubscriptionId, DeliveryError> {
        if self.fail_subscribe {
            return Err(DeliveryError::Registration("mock subscribe failure".into()));
        }
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.active.push((id, filter.clone()));
        self.subscribe_count += 1;
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), DeliveryError> {
        let before = self.active.len();
        self.drop_subscription(id);
        if self.active.len() == before {
            return Err(DeliveryError::NotRegistered(id));
        }
        self.unsubscribed.push(id);
        Ok(())
    }
}

/// Scheduler that holds delayed work until the test fires it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: Vec<(Duration, RetryToken)>,
    delays: Vec<Duration>,
}

impl ManualScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the oldest pending item.
    pub fn take_next(&mut self) -> Option<(Duration, RetryToken)> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    /// Number of items not yet taken.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Delays of every item ever posted, in order.
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Number of items ever posted.
    pub fn post_count(&self) -> usize {
        self.delays.len()
    }
}

impl Scheduler for ManualScheduler {
    fn post_delayed(&mut self, delay: Duration, token: RetryToken) {
        self.pending.push((delay, token));
        self.delays.push(delay);
    }
}

/// Launcher that records handles, optionally failing.
#[derive(Debug, Default)]
pub struct MockLauncher {
    launched: Mutex<Vec<ConsentHandle>>,
    error: Mutex<Option<LaunchError>>,
}

impl MockLauncher {
    /// Creates a launcher that always succeeds.
    pub fn new() -> Arc<Self> {
        Arc::new(MockLauncher::default())
    }

    /// Creates a launcher that always fails with `error`.
    pub fn failing(error: LaunchError) -> Arc<Self> {
        Arc::new(MockLauncher {
            launched: Mutex::new(Vec::new()),
            error: Mutex::new(Some(error)),
        })
    }

    /// Handles launched so far.
    pub fn launched(&self) -> Vec<ConsentHandle> {
        self.launched.lock().unwrap().clone()
    }
}

impl ConsentLauncher for MockLauncher {
    fn launch(&self, handle: &ConsentHandle) -> Result<(), LaunchError> {
        if let Some(error) = self.error.lock().unwrap().clone() {
            return Err(error);
        }
        self.launched.lock().unwrap().push(handle.clone());
        Ok(())
    }
}
