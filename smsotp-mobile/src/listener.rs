// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mobile Consent Listener
//!
//! Thread-safe object wrapping the core controller for Kotlin and Swift.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use smsotp_core::{
    BroadcastEvent, CallbackSink, ConsentConfig, ConsentListenerController, ConsentResult,
    HostRef, RetryToken, ServiceError, StartTicket, SubscriptionId,
};

use crate::error::MobileError;
use crate::platform::{
    CallbackOutbox, ConsentCallback, HostLiveness, PlatformConsentHost, PlatformConsentLauncher,
    PlatformDelivery, PlatformLauncher, PlatformScheduler, PlatformService,
};
use crate::types::{MobileBroadcastEvent, MobileConsentConfig, MobileSessionStatus};

type PlatformController =
    ConsentListenerController<PlatformService, PlatformDelivery, PlatformScheduler>;

/// SMS consent listener for mobile hosts.
///
/// All methods are expected to be called from the platform main thread.
/// Callback results are delivered after the internal lock is released, so a
/// [`ConsentCallback`] may call `start` or `stop` from inside a notification.
#[derive(uniffi::Object)]
pub struct MobileConsentListener {
    controller: Mutex<PlatformController>,
    /// Strong owner of the controller's host reference.
    host: Mutex<Option<Arc<HostLiveness>>>,
    /// Strong owner of the controller's sink reference.
    outbox: Mutex<Option<Arc<CallbackOutbox>>>,
}

impl MobileConsentListener {
    /// Runs `f` on the controller, then delivers queued notifications.
    fn with_controller<R>(&self, f: impl FnOnce(&mut PlatformController) -> R) -> R {
        let result = {
            let mut controller = self.controller.lock();
            f(&mut controller)
        };
        self.flush();
        result
    }

    fn flush(&self) {
        let outbox = self.outbox.lock().clone();
        if let Some(outbox) = outbox {
            outbox.flush();
        }
    }
}

#[uniffi::export]
impl MobileConsentListener {
    /// Create a listener with the default configuration.
    #[uniffi::constructor]
    pub fn new(
        host: Box<dyn PlatformConsentHost>,
        callback: Box<dyn ConsentCallback>,
    ) -> Arc<Self> {
        Self::with_config(host, callback, MobileConsentConfig::default())
    }

    /// Create a listener with a custom retry configuration.
    #[uniffi::constructor]
    pub fn with_config(
        host: Box<dyn PlatformConsentHost>,
        callback: Box<dyn ConsentCallback>,
        config: MobileConsentConfig,
    ) -> Arc<Self> {
        let platform: Arc<dyn PlatformConsentHost> = Arc::from(host);
        let liveness = Arc::new(HostLiveness(platform.clone()));
        let outbox = Arc::new(CallbackOutbox::new(Arc::from(callback)));

        let controller = ConsentListenerController::new(
            PlatformService(platform.clone()),
            PlatformDelivery(platform.clone()),
            PlatformScheduler(platform),
            HostRef::from_arc(&liveness),
            Arc::downgrade(&outbox) as Weak<dyn CallbackSink>,
            ConsentConfig::from(config),
        );

        Arc::new(MobileConsentListener {
            controller: Mutex::new(controller),
            host: Mutex::new(Some(liveness)),
            outbox: Mutex::new(Some(outbox)),
        })
    }

    /// Set the consent UI launcher.
    pub fn set_launcher(&self, launcher: Box<dyn PlatformConsentLauncher>) {
        let launcher = Arc::new(PlatformLauncher(Arc::from(launcher)));
        self.controller.lock().set_launcher(Some(launcher));
    }

    /// Start listening for a consent SMS.
    pub fn start(&self) -> Result<(), MobileError> {
        self.with_controller(|c| c.start()).map_err(MobileError::from)
    }

    /// Stop listening. Safe to call repeatedly.
    pub fn stop(&self) -> Result<(), MobileError> {
        self.with_controller(|c| c.stop()).map_err(MobileError::from)
    }

    /// The platform started listening for the request tagged `generation`.
    pub fn on_listening_started(&self, generation: u64, attempt: u32) {
        self.with_controller(|c| {
            c.on_listening_result(StartTicket::new(generation, attempt), Ok(()))
        });
    }

    /// The platform failed to start listening for the request tagged `generation`.
    pub fn on_listening_failed(&self, generation: u64, attempt: u32, message: String) {
        self.with_controller(|c| {
            c.on_listening_result(
                StartTicket::new(generation, attempt),
                Err(ServiceError::new(message)),
            )
        });
    }

    /// A delay posted through `post_delayed` has elapsed.
    pub fn on_retry_due(&self, generation: u64) {
        self.with_controller(|c| c.run_retry(RetryToken::new(generation)));
    }

    /// A registered receiver got an event.
    pub fn on_broadcast(&self, subscription_id: u64, event: MobileBroadcastEvent) {
        let event: BroadcastEvent = event.into();
        self.with_controller(|c| c.on_broadcast(SubscriptionId(subscription_id), &event));
    }

    /// The consent UI returned.
    ///
    /// `approved` is true for `RESULT_OK`; `sms` is the message text it carried.
    pub fn on_consent_result(&self, approved: bool, sms: Option<String>) {
        let result = if approved {
            ConsentResult::Approved { sms }
        } else {
            ConsentResult::Denied
        };
        self.with_controller(|c| c.on_consent_result(result));
    }

    /// The host UI was destroyed. Later operations needing it report
    /// `NULL_ACTIVITY`.
    pub fn detach_host(&self) {
        debug!("Detaching host");
        self.host.lock().take();
    }

    /// Stop delivering results. Pending results are delivered first.
    pub fn clear_callback(&self) {
        self.flush();
        self.outbox.lock().take();
    }

    /// Current session status.
    pub fn status(&self) -> MobileSessionStatus {
        self.controller.lock().status().into()
    }

    /// Start retries scheduled in the current cycle.
    pub fn retry_count(&self) -> u32 {
        self.controller.lock().retry_count()
    }

    /// Whether a broadcast receiver is registered.
    pub fn has_receiver(&self) -> bool {
        self.controller.lock().has_receiver()
    }
}
