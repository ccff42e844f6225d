// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Consent Listener Controller
//!
//! Owns the listen session, the retry policy and the delivery subscription.

use std::sync::{Arc, Weak};

use tracing::{debug, error, info, warn};

use super::config::ConsentConfig;
use super::error::{ConsentError, ErrorCode, ListenerError, ListenerResult};
use super::event::{BroadcastEvent, ConsentResult};
use super::platform::{
    BroadcastDelivery, CallbackSink, ConsentHandle, ConsentLauncher, ConsentService,
    HostContext, HostRef, LaunchError, RetryToken, Scheduler, ServiceError, StartTicket,
    SubscriptionId,
};
use super::receiver::{ConsentBroadcastHandler, ConsentDispatch};
use super::session::{ListenSession, SessionStatus};

/// Lifecycle controller for the SMS consent listener.
///
/// Starts the consent service, retries failed starts with backoff,
/// subscribes a [`ConsentBroadcastHandler`] for the delivery window and
/// restarts the cycle after every delivered code or error until
/// [`stop`](Self::stop) is called.
///
/// Every method must be called from the host's owner thread.
pub struct ConsentListenerController<S, D, K>
where
    S: ConsentService,
    D: BroadcastDelivery,
    K: Scheduler,
{
    service: S,
    delivery: D,
    scheduler: K,
    host: HostRef,
    sink: Weak<dyn CallbackSink>,
    launcher: Option<Arc<dyn ConsentLauncher>>,
    config: ConsentConfig,
    session: ListenSession,
    /// Bumped on every new cycle and on stop; stale tickets and retries are dropped.
    generation: u64,
    receiver: Option<ConsentBroadcastHandler>,
    stop_requested: bool,
    /// Restarts since the last successful registration.
    unproductive_restarts: u32,
}

impl<S, D, K> ConsentListenerController<S, D, K>
where
    S: ConsentService,
    D: BroadcastDelivery,
    K: Scheduler,
{
    /// Creates a new controller.
    pub fn new(
        service: S,
        delivery: D,
        scheduler: K,
        host: HostRef,
        sink: Weak<dyn CallbackSink>,
        config: ConsentConfig,
    ) -> Self {
        ConsentListenerController {
            service,
            delivery,
            scheduler,
            host,
            sink,
            launcher: None,
            config,
            session: ListenSession::new(),
            generation: 0,
            receiver: None,
            stop_requested: false,
            unproductive_restarts: 0,
        }
    }

    /// Sets the consent UI launcher.
    pub fn with_launcher(mut self, launcher: Arc<dyn ConsentLauncher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    /// Replaces the consent UI launcher.
    pub fn set_launcher(&mut self, launcher: Option<Arc<dyn ConsentLauncher>>) {
        self.launcher = launcher;
    }

    // ============================================================
    // Caller operations
    // ============================================================

    /// Starts a listen cycle.
    ///
    /// Fails with `NULL_ACTIVITY` if the host is gone, with
    /// `SMS_RETRIEVER_ERROR` if the service refused the request, and with
    /// [`ListenerError::SessionActive`] while a session is listening or
    /// awaiting consent. Results arrive through the callback sink.
    pub fn start(&mut self) -> ListenerResult<()> {
        if self.session.is_active() {
            warn!(status = %self.session.status(), "Rejecting start, session already active");
            return Err(ListenerError::SessionActive(self.session.status()));
        }
        self.stop_requested = false;
        self.unproductive_restarts = 0;
        self.begin()
    }

    /// Stops listening.
    ///
    /// Idempotent. Pending retries and service completions are invalidated
    /// and the delivery subscription is removed. If unsubscribing fails the
    /// local state is still cleared and `NULL_BROADCAST_RECEIVER` is returned.
    pub fn stop(&mut self) -> ListenerResult<()> {
        self.stop_requested = true;
        self.stop_listener().map_err(ListenerError::from)
    }

    /// Delivers an approved SMS to the sink, then restarts.
    pub fn handle_sms(&mut self, sms: &str) {
        debug!(len = sms.len(), "Handling SMS");
        self.session.complete();
        match self.sink.upgrade() {
            Some(sink) => {
                sink.on_sms_received(sms);
                debug!("SMS callback triggered");
            }
            None => error!("Callback sink is gone, dropping SMS"),
        }
        self.restart();
    }

    /// Reports an error to the sink, then restarts.
    pub fn handle_error(&mut self, error: ConsentError) {
        error!(code = %error.code(), message = error.message(), "Handling error");
        self.session.fail();
        self.notify_error(&error);
        self.restart();
    }

    /// Launches the consent UI for `handle`.
    ///
    /// Fails with [`LaunchError::NoLauncher`] when no launcher is set. Launch
    /// failures are returned to the caller, which reports them.
    pub fn start_consent_intent(&mut self, handle: ConsentHandle) -> Result<(), LaunchError> {
        let Some(launcher) = self.launcher.clone() else {
            return Err(LaunchError::NoLauncher);
        };

        launcher.launch(&handle)?;
        self.session.await_consent();
        Ok(())
    }

    // ============================================================
    // Owner-thread completions
    // ============================================================

    /// Completion of [`ConsentService::start_listening`].
    pub fn on_listening_result(&mut self, ticket: StartTicket, result: Result<(), ServiceError>) {
        if ticket.generation() != self.generation
            || self.session.status() != SessionStatus::Starting
        {
            debug!(
                generation = ticket.generation(),
                current = self.generation,
                "Dropping stale listener start result"
            );
            return;
        }

        match result {
            Ok(()) => {
                info!(attempt = ticket.attempt(), "SMS user consent started");
                self.session.listening();
                self.register_receiver();
            }
            Err(e) => {
                warn!(attempt = ticket.attempt(), error = %e, "Failed to start SMS user consent");
                self.retry_or_fail();
            }
        }
    }

    /// A delayed retry scheduled through [`Scheduler::post_delayed`] is due.
    pub fn run_retry(&mut self, token: RetryToken) {
        if token.generation() != self.generation
            || self.session.status() != SessionStatus::Starting
        {
            debug!(generation = token.generation(), "Dropping cancelled retry");
            return;
        }

        let Some(host) = self.host.get() else {
            error!("Host is gone, abandoning retry");
            self.session.fail();
            self.notify_error(&ErrorCode::NullActivity.into());
            self.session.settle();
            return;
        };

        if let Err(e) = self.request_listening(host.as_ref()) {
            self.handle_error(e);
        }
    }

    /// An event delivered to `subscription`.
    pub fn on_broadcast(&mut self, subscription: SubscriptionId, event: &BroadcastEvent) {
        let Some(handler) = self
            .receiver
            .as_mut()
            .filter(|handler| handler.subscription() == subscription)
        else {
            debug!(%subscription, "Dropping delivery for stale subscription");
            return;
        };

        let Some(outcome) = handler.receive(event) else {
            return;
        };
        let handler = handler.clone();
        handler.dispatch(outcome, self);
    }

    /// Result of the consent UI.
    pub fn on_consent_result(&mut self, result: ConsentResult) {
        if self.session.status() != SessionStatus::AwaitingConsent {
            debug!(status = %self.session.status(), "Ignoring consent result");
            return;
        }

        match result {
            ConsentResult::Approved { sms: Some(sms) } => self.handle_sms(&sms),
            ConsentResult::Approved { sms: None } => self.handle_error(ConsentError::new(
                ErrorCode::CouldNotHandleBroadcast,
                "Failed to retrieve SMS message",
            )),
            ConsentResult::Denied => self.handle_error(ConsentError::new(
                ErrorCode::CouldNotHandleBroadcast,
                "SMS consent was denied",
            )),
        }
    }

    // ============================================================
    // Accessors
    // ============================================================

    /// Returns the current session status.
    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    /// Returns the current session.
    pub fn session(&self) -> &ListenSession {
        &self.session
    }

    /// Returns the retry count of the current cycle.
    pub fn retry_count(&self) -> u32 {
        self.session.retry_count()
    }

    /// Returns the active delivery subscription, if any.
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.receiver.as_ref().map(|r| r.subscription())
    }

    /// Returns true if a broadcast handler is registered.
    pub fn has_receiver(&self) -> bool {
        self.receiver.is_some()
    }

    /// Returns true if [`stop`](Self::stop) was called since the last start.
    pub fn is_stopped(&self) -> bool {
        self.stop_requested
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ConsentConfig {
        &self.config
    }

    /// Returns a reference to the consent service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Returns a mutable reference to the consent service.
    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    /// Returns a reference to the delivery mechanism.
    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    /// Returns a mutable reference to the delivery mechanism.
    pub fn delivery_mut(&mut self) -> &mut D {
        &mut self.delivery
    }

    /// Returns a reference to the scheduler.
    pub fn scheduler(&self) -> &K {
        &self.scheduler
    }

    /// Returns a mutable reference to the scheduler.
    pub fn scheduler_mut(&mut self) -> &mut K {
        &mut self.scheduler
    }

    // ============================================================
    // Transitions
    // ============================================================

    /// Idle -> Starting and the first service request.
    fn begin(&mut self) -> ListenerResult<()> {
        if self.session.is_active() {
            return Err(ListenerError::SessionActive(self.session.status()));
        }

        let Some(host) = self.host.get() else {
            error!("{}", ErrorCode::NullActivity.message());
            return Err(ErrorCode::NullActivity.into());
        };

        self.generation += 1;
        self.session.begin();
        info!(generation = self.generation, "Starting SMS user consent");
        self.request_listening(host.as_ref())?;
        Ok(())
    }

    fn request_listening(&mut self, host: &dyn HostContext) -> Result<(), ConsentError> {
        let ticket = StartTicket::new(self.generation, self.session.retry_count());
        self.service.start_listening(host, ticket).map_err(|e| {
            error!(error = %e, "Error starting SMS listener");
            self.session.settle();
            ConsentError::with_cause(ErrorCode::SmsRetrieverError, e)
        })
    }

    /// Starting -> Starting with a delayed retry, or Starting -> Failed -> Idle.
    fn retry_or_fail(&mut self) {
        let policy = &self.config.retry;
        let retry = self.session.retry_count();

        if retry < policy.max_retries {
            let delay = policy.delay_for(retry, &mut rand::thread_rng());
            self.session.record_retry();
            info!(
                attempt = retry + 1,
                max = policy.max_retries,
                delay_ms = delay.as_millis() as u64,
                "Retrying SMS user consent"
            );
            self.scheduler
                .post_delayed(delay, RetryToken::new(self.generation));
        } else {
            error!(retries = retry, "{}", ErrorCode::MaxRetriesReached.message());
            self.session.fail();
            self.notify_error(&ErrorCode::MaxRetriesReached.into());
            self.session.settle();
        }
    }

    /// Listening: subscribe the broadcast handler.
    fn register_receiver(&mut self) {
        let Some(host) = self.host.get() else {
            self.handle_error(ErrorCode::NullActivity.into());
            return;
        };

        let filter = self.config.delivery_filter();
        match self.delivery.subscribe(host.as_ref(), &filter) {
            Ok(subscription) => {
                info!(%subscription, "Broadcast receiver registered");
                self.receiver = Some(ConsentBroadcastHandler::new(
                    subscription,
                    filter.action,
                    self.host.clone(),
                ));
                self.unproductive_restarts = 0;
            }
            Err(e) => {
                error!(error = %e, "Error registering broadcast receiver");
                self.handle_error(ConsentError::with_cause(ErrorCode::RegistrationError, e));
            }
        }
    }

    /// Invalidates pending work, unsubscribes and settles to Idle.
    fn stop_listener(&mut self) -> Result<(), ConsentError> {
        self.generation += 1;
        self.session.settle();

        let Some(handler) = self.receiver.take() else {
            debug!("Broadcast receiver is already null, nothing to unregister");
            return Ok(());
        };

        let subscription = handler.subscription();
        match self.delivery.unsubscribe(subscription) {
            Ok(()) => {
                debug!(%subscription, "Broadcast receiver unregistered");
                Ok(())
            }
            Err(e) => {
                error!(%subscription, error = %e, "Error unregistering receiver");
                Err(ErrorCode::NullBroadcastReceiver.into())
            }
        }
    }

    /// Stop then start. Failures are reported once and never restart again.
    fn restart(&mut self) {
        debug!("Restarting SMS listener");
        if let Err(e) = self.stop_listener() {
            self.notify_error(&e);
        }

        if self.stop_requested {
            debug!("Stop was requested, not restarting");
            return;
        }

        if self.unproductive_restarts >= self.config.max_unproductive_restarts {
            warn!(
                restarts = self.unproductive_restarts,
                "Listener keeps failing before registration, giving up until next start"
            );
            return;
        }
        self.unproductive_restarts += 1;

        match self.begin() {
            Ok(()) => debug!("SMS listener restarted"),
            Err(e) => self.notify_error(&e.into_consent()),
        }
    }

    fn notify_error(&self, error: &ConsentError) {
        match self.sink.upgrade() {
            Some(sink) => sink.on_error(error.code(), error.message()),
            None => error!(
                code = %error.code(),
                message = error.message(),
                "Callback sink is gone, error not delivered"
            ),
        }
    }
}

impl<S, D, K> ConsentDispatch for ConsentListenerController<S, D, K>
where
    S: ConsentService,
    D: BroadcastDelivery,
    K: Scheduler,
{
    fn start_consent_intent(&mut self, handle: ConsentHandle) -> Result<(), LaunchError> {
        ConsentListenerController::start_consent_intent(self, handle)
    }

    fn handle_error(&mut self, error: ConsentError) {
        ConsentListenerController::handle_error(self, error)
    }
}
