// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Platform Collaborators
//!
//! Traits the host implements so the controller can drive the platform
//! consent API without knowing anything about it.
//!
//! # Synchronous Interface
//!
//! Every method here is called on the owner thread and must return promptly.
//! Work that completes later (the service start, event delivery, delayed
//! retries) is reported back by calling the matching controller entry point
//! on the owner thread, never from inside these calls.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use thiserror::Error;

use super::error::ErrorCode;

/// Host UI context the listener is bound to.
pub trait HostContext: Send + Sync {
    /// Returns false once the host is finishing or torn down.
    fn is_live(&self) -> bool;
}

struct DetachedHost;

impl HostContext for DetachedHost {
    fn is_live(&self) -> bool {
        false
    }
}

/// Non-owning, liveness-checked reference to the host.
#[derive(Clone)]
pub struct HostRef {
    inner: Weak<dyn HostContext>,
}

impl HostRef {
    /// Wraps a weak host reference.
    pub fn new(inner: Weak<dyn HostContext>) -> Self {
        HostRef { inner }
    }

    /// Creates a reference to a host without taking ownership of it.
    pub fn from_arc<H: HostContext + 'static>(host: &Arc<H>) -> Self {
        let inner: Weak<H> = Arc::downgrade(host);
        HostRef { inner }
    }

    /// A reference that is never live.
    pub fn detached() -> Self {
        let inner: Weak<dyn HostContext> = Weak::<DetachedHost>::new();
        HostRef { inner }
    }

    /// Returns the host if it still exists and reports itself live.
    pub fn get(&self) -> Option<Arc<dyn HostContext>> {
        self.inner.upgrade().filter(|host| host.is_live())
    }

    /// Returns true if the host still exists and reports itself live.
    pub fn is_live(&self) -> bool {
        self.get().is_some()
    }
}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRef")
            .field("live", &self.is_live())
            .finish()
    }
}

/// Receiver of the final code or error.
///
/// Held weakly by the controller; a dropped sink is treated as an error path.
pub trait CallbackSink: Send + Sync {
    /// Called with the full SMS text the user agreed to share.
    fn on_sms_received(&self, sms: &str);

    /// Called once per failed session.
    fn on_error(&self, code: ErrorCode, message: &str);
}

/// Identifies one asynchronous listener start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StartTicket {
    generation: u64,
    attempt: u32,
}

impl StartTicket {
    /// Creates a ticket. Hosts normally only echo back tickets they were given.
    pub fn new(generation: u64, attempt: u32) -> Self {
        StartTicket {
            generation,
            attempt,
        }
    }

    /// Cycle the start belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Retry attempt within the cycle, 0 for the first try.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

/// Error from the consent service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
}

impl ServiceError {
    /// Creates a service error.
    pub fn new(message: impl Into<String>) -> Self {
        ServiceError {
            message: message.into(),
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The platform SMS consent service.
///
/// There is no stop call: cancelling is done by unsubscribing delivery.
pub trait ConsentService: Send {
    /// Asks the platform to watch for one matching SMS.
    ///
    /// `Err` means the request could not be issued at all. Otherwise the
    /// outcome is reported later through
    /// [`ConsentListenerController::on_listening_result`](super::ConsentListenerController::on_listening_result)
    /// with the same ticket.
    fn start_listening(
        &mut self,
        host: &dyn HostContext,
        ticket: StartTicket,
    ) -> Result<(), ServiceError>;
}

/// Handle to one delivery subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Which events a subscription accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFilter {
    /// Event action to match.
    pub action: String,
    /// Permission the sender must hold, if any.
    pub permission: Option<String>,
    /// Whether the subscription is visible outside the host.
    pub exported: bool,
}

/// Delivery subscription errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Subscribing failed.
    #[error("registration failed: {0}")]
    Registration(String),

    /// The subscription is no longer registered.
    #[error("{0} is not registered")]
    NotRegistered(SubscriptionId),
}

/// Single-shot event subscription for the SMS-retrieved event.
///
/// Deliveries are reported through
/// [`ConsentListenerController::on_broadcast`](super::ConsentListenerController::on_broadcast).
pub trait BroadcastDelivery: Send {
    /// Registers a subscription scoped to the host.
    fn subscribe(
        &mut self,
        host: &dyn HostContext,
        filter: &DeliveryFilter,
    ) -> Result<SubscriptionId, DeliveryError>;

    /// Removes a subscription.
    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), DeliveryError>;
}

/// Opaque reference to the user-facing consent UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsentHandle(String);

impl ConsentHandle {
    /// Wraps a platform handle.
    pub fn new(handle: impl Into<String>) -> Self {
        ConsentHandle(handle.into())
    }

    /// Returns the platform handle.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConsentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Consent UI launch failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// Nothing can display the consent UI.
    #[error("No activity found to handle consent intent: {0}")]
    TargetNotFound(String),

    /// The host may not launch the consent UI.
    #[error("Security exception: {0}")]
    PermissionDenied(String),

    /// The host is in a state that cannot launch UI.
    #[error("Illegal state: {0}")]
    InvalidHostState(String),

    /// Any other launch failure.
    #[error("Failed to start consent intent: {0}")]
    Other(String),

    /// No launcher is configured.
    #[error("Launcher is null")]
    NoLauncher,
}

/// Launches the consent UI. Fire-and-forget; the result comes back through
/// [`ConsentListenerController::on_consent_result`](super::ConsentListenerController::on_consent_result).
pub trait ConsentLauncher: Send + Sync {
    /// Shows the consent UI for `handle`.
    fn launch(&self, handle: &ConsentHandle) -> Result<(), LaunchError>;
}

/// A delayed listener-start retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryToken {
    generation: u64,
}

impl RetryToken {
    /// Creates a token for the cycle `generation`.
    pub fn new(generation: u64) -> Self {
        RetryToken { generation }
    }

    /// Cycle the retry belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Delayed work on the owner thread.
pub trait Scheduler: Send {
    /// Runs [`ConsentListenerController::run_retry`](super::ConsentListenerController::run_retry)
    /// with `token` after `delay`.
    fn post_delayed(&mut self, delay: Duration, token: RetryToken);
}

// INLINE_TEST_REQUIRED: DetachedHost is private
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FlagHost(AtomicBool);

    impl HostContext for FlagHost {
        fn is_live(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_host_ref_follows_liveness() {
        let host = Arc::new(FlagHost(AtomicBool::new(true)));
        let host_ref = HostRef::from_arc(&host);
        assert!(host_ref.is_live());

        host.0.store(false, Ordering::SeqCst);
        assert!(!host_ref.is_live());
    }

    #[test]
    fn test_host_ref_does_not_keep_host_alive() {
        let host = Arc::new(FlagHost(AtomicBool::new(true)));
        let host_ref = HostRef::from_arc(&host);

        drop(host);
        assert!(host_ref.get().is_none());
    }

    #[test]
    fn test_host_ref_from_weak() {
        let host = Arc::new(FlagHost(AtomicBool::new(true)));
        let host_ref = HostRef::new(Arc::downgrade(&host) as Weak<dyn HostContext>);
        assert!(host_ref.is_live());

        drop(host);
        assert!(!host_ref.is_live());
    }

    #[test]
    fn test_detached_host_ref() {
        assert!(!HostRef::detached().is_live());
    }
}
