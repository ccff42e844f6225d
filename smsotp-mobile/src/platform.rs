// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mobile Platform Bridge
//!
//! Callback interfaces implemented in Kotlin (Android) or Swift (iOS), and
//! the adapters that plug them into the core controller.
//!
//! Every platform call made from here runs while the listener's controller
//! lock is held. Implementations must not call back into
//! [`MobileConsentListener`](crate::MobileConsentListener) synchronously;
//! completions are posted to the main thread and delivered from there.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use smsotp_core::{
    BroadcastDelivery, CallbackSink, ConsentHandle, ConsentLauncher, ConsentService,
    DeliveryError, DeliveryFilter, ErrorCode, HostContext, LaunchError, RetryToken, Scheduler,
    ServiceError, StartTicket, SubscriptionId,
};

use crate::types::{MobileErrorCode, MobileLaunchResult, MobileRegistration};

/// Callback interface for the platform side of the consent listener.
///
/// Android implements this on top of `SmsRetriever`, `registerReceiver` and
/// a main-thread `Handler`.
#[uniffi::export(callback_interface)]
pub trait PlatformConsentHost: Send + Sync {
    /// Whether the host UI is present and not finishing.
    fn is_live(&self) -> bool;

    /// Ask the platform to start listening for a consent SMS.
    ///
    /// The asynchronous result must be reported through
    /// `on_listening_started` or `on_listening_failed` with the same
    /// `generation` and `attempt`.
    ///
    /// Returns empty string on success, error message if the request could
    /// not be issued.
    fn start_listening(&self, generation: u64, attempt: u32) -> String;

    /// Register a receiver for `action`, restricted to senders holding
    /// `permission` when set.
    fn register_receiver(
        &self,
        action: String,
        permission: Option<String>,
        exported: bool,
    ) -> MobileRegistration;

    /// Unregister a receiver.
    ///
    /// Returns empty string on success, error message otherwise.
    fn unregister_receiver(&self, subscription_id: u64) -> String;

    /// Call `on_retry_due(generation)` on the main thread after `delay_ms`.
    fn post_delayed(&self, delay_ms: u64, generation: u64);
}

/// Callback interface for launching the consent UI.
#[uniffi::export(callback_interface)]
pub trait PlatformConsentLauncher: Send + Sync {
    /// Show the consent UI for `handle`. The user's decision is reported
    /// through `on_consent_result`.
    fn launch(&self, handle: String) -> MobileLaunchResult;
}

/// Callback interface receiving listener results.
#[uniffi::export(callback_interface)]
pub trait ConsentCallback: Send + Sync {
    /// An approved SMS.
    fn on_sms_received(&self, sms: String);

    /// A listener error.
    fn on_error(&self, code: MobileErrorCode, message: String);
}

/// Host liveness as seen by the controller.
pub(crate) struct HostLiveness(pub(crate) Arc<dyn PlatformConsentHost>);

impl HostContext for HostLiveness {
    fn is_live(&self) -> bool {
        self.0.is_live()
    }
}

/// Consent service backed by the platform host.
pub(crate) struct PlatformService(pub(crate) Arc<dyn PlatformConsentHost>);

impl ConsentService for PlatformService {
    fn start_listening(
        &mut self,
        _host: &dyn HostContext,
        ticket: StartTicket,
    ) -> Result<(), ServiceError> {
        let error = self.0.start_listening(ticket.generation(), ticket.attempt());
        if error.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::new(error))
        }
    }
}

/// Broadcast delivery backed by the platform host.
pub(crate) struct PlatformDelivery(pub(crate) Arc<dyn PlatformConsentHost>);

impl BroadcastDelivery for PlatformDelivery {
    fn subscribe(
        &mut self,
        _host: &dyn HostContext,
        filter: &DeliveryFilter,
    ) -> Result<SubscriptionId, DeliveryError> {
        let registration = self.0.register_receiver(
            filter.action.clone(),
            filter.permission.clone(),
            filter.exported,
        );
        if registration.error.is_empty() {
            Ok(SubscriptionId(registration.subscription_id))
        } else {
            Err(DeliveryError::Registration(registration.error))
        }
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), DeliveryError> {
        let error = self.0.unregister_receiver(id.0);
        if error.is_empty() {
            Ok(())
        } else {
            debug!(subscription = %id, error = %error, "Platform refused unregister");
            Err(DeliveryError::NotRegistered(id))
        }
    }
}

/// Delayed work on the platform main thread.
pub(crate) struct PlatformScheduler(pub(crate) Arc<dyn PlatformConsentHost>);

impl Scheduler for PlatformScheduler {
    fn post_delayed(&mut self, delay: Duration, token: RetryToken) {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.0.post_delayed(delay_ms, token.generation());
    }
}

/// Consent UI launcher backed by the platform.
pub(crate) struct PlatformLauncher(pub(crate) Arc<dyn PlatformConsentLauncher>);

impl ConsentLauncher for PlatformLauncher {
    fn launch(&self, handle: &ConsentHandle) -> Result<(), LaunchError> {
        self.0.launch(handle.as_str().to_string()).into_result()
    }
}

enum Notification {
    Sms(String),
    Error(ErrorCode, String),
}

/// Sink that queues notifications until the controller lock is released.
pub(crate) struct CallbackOutbox {
    callback: Arc<dyn ConsentCallback>,
    pending: Mutex<Vec<Notification>>,
}

impl CallbackOutbox {
    pub(crate) fn new(callback: Arc<dyn ConsentCallback>) -> Self {
        CallbackOutbox {
            callback,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Delivers queued notifications in order.
    pub(crate) fn flush(&self) {
        let pending = std::mem::take(&mut *self.pending.lock());
        for notification in pending {
            match notification {
                Notification::Sms(sms) => self.callback.on_sms_received(sms),
                Notification::Error(code, message) => {
                    self.callback.on_error(code.into(), message)
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

impl CallbackSink for CallbackOutbox {
    fn on_sms_received(&self, sms: &str) {
        self.pending.lock().push(Notification::Sms(sms.to_string()));
    }

    fn on_error(&self, code: ErrorCode, message: &str) {
        self.pending
            .lock()
            .push(Notification::Error(code, message.to_string()));
    }
}
