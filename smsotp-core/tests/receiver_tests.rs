// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for the consent broadcast handler.

use smsotp_core::consent::*;

/// Dispatch target that records calls.
#[derive(Default)]
struct RecordingTarget {
    launched: Vec<ConsentHandle>,
    errors: Vec<ConsentError>,
    launch_error: Option<LaunchError>,
}

impl ConsentDispatch for RecordingTarget {
    fn start_consent_intent(&mut self, handle: ConsentHandle) -> Result<(), LaunchError> {
        if let Some(e) = self.launch_error.clone() {
            return Err(e);
        }
        self.launched.push(handle);
        Ok(())
    }

    fn handle_error(&mut self, error: ConsentError) {
        self.errors.push(error);
    }
}

fn handler(host: &std::sync::Arc<MockHost>) -> ConsentBroadcastHandler {
    ConsentBroadcastHandler::new(SubscriptionId(1), SMS_RETRIEVED_ACTION, HostRef::from_arc(host))
}

fn payload(status: Option<i32>, handle: Option<&str>) -> BroadcastEvent {
    BroadcastEvent::sms_retrieved(Some(EventPayload {
        status,
        consent_handle: handle.map(ConsentHandle::new),
    }))
}

// === Validation ===

#[test]
fn test_success_event_yields_handle() {
    let host = MockHost::live();
    let mut handler = handler(&host);

    let outcome = handler.receive(&payload(Some(STATUS_SUCCESS), Some("H")));

    assert_eq!(outcome, Some(ConsentOutcome::Success(ConsentHandle::new("H"))));
    assert!(handler.is_spent());
}

#[test]
fn test_timeout_event() {
    let host = MockHost::live();
    let mut handler = handler(&host);

    let outcome = handler.receive(&payload(Some(STATUS_TIMEOUT), Some("H")));

    assert_eq!(outcome, Some(ConsentOutcome::Timeout));
}

#[test]
fn test_missing_extras() {
    let host = MockHost::live();

    let mut absent = handler(&host);
    assert_eq!(
        absent.receive(&BroadcastEvent::sms_retrieved(None)),
        Some(ConsentOutcome::MalformedEvent("Intent extras are null".into()))
    );

    let mut empty = handler(&host);
    assert_eq!(
        empty.receive(&payload(None, None)),
        Some(ConsentOutcome::MalformedEvent("Intent extras are null".into()))
    );
}

#[test]
fn test_missing_status() {
    let host = MockHost::live();
    let mut handler = handler(&host);

    assert_eq!(
        handler.receive(&payload(None, Some("H"))),
        Some(ConsentOutcome::MalformedEvent(
            "SMS retriever status is null".into()
        ))
    );
}

#[test]
fn test_missing_handle_checked_before_status_value() {
    let host = MockHost::live();
    let mut handler = handler(&host);

    assert_eq!(
        handler.receive(&payload(Some(STATUS_TIMEOUT), None)),
        Some(ConsentOutcome::MalformedEvent("Consent intent is null".into()))
    );
}

#[test]
fn test_unknown_status() {
    let host = MockHost::live();
    let mut handler = handler(&host);

    assert_eq!(
        handler.receive(&payload(Some(13), Some("H"))),
        Some(ConsentOutcome::MalformedEvent("Unknown status code: 13".into()))
    );
}

#[test]
fn test_unrelated_action_does_not_spend_handler() {
    let host = MockHost::live();
    let mut handler = handler(&host);

    let event = BroadcastEvent::new("android.intent.action.TIME_TICK", None);
    assert_eq!(handler.receive(&event), None);
    assert!(!handler.is_spent());
}

#[test]
fn test_second_event_is_ignored() {
    let host = MockHost::live();
    let mut handler = handler(&host);

    assert!(handler
        .receive(&payload(Some(STATUS_TIMEOUT), Some("H")))
        .is_some());
    assert_eq!(
        handler.receive(&payload(Some(STATUS_SUCCESS), Some("H"))),
        None
    );
}

// === Dispatch ===

#[test]
fn test_dispatch_success_launches() {
    let host = MockHost::live();
    let handler = handler(&host);
    let mut target = RecordingTarget::default();

    handler.dispatch(ConsentOutcome::Success(ConsentHandle::new("H")), &mut target);

    assert_eq!(target.launched, vec![ConsentHandle::new("H")]);
    assert!(target.errors.is_empty());
}

#[test]
fn test_dispatch_success_without_host() {
    let host = MockHost::live();
    let handler = handler(&host);
    host.finish();
    let mut target = RecordingTarget::default();

    handler.dispatch(ConsentOutcome::Success(ConsentHandle::new("H")), &mut target);

    assert!(target.launched.is_empty());
    assert_eq!(target.errors.len(), 1);
    assert_eq!(target.errors[0].code(), ErrorCode::CouldNotHandleBroadcast);
    assert_eq!(target.errors[0].message(), "Activity is not available");
}

#[test]
fn test_dispatch_launch_failure() {
    let host = MockHost::live();
    let handler = handler(&host);
    let mut target = RecordingTarget {
        launch_error: Some(LaunchError::TargetNotFound("no consent activity".into())),
        ..Default::default()
    };

    handler.dispatch(ConsentOutcome::Success(ConsentHandle::new("H")), &mut target);

    assert_eq!(target.errors.len(), 1);
    assert_eq!(target.errors[0].code(), ErrorCode::CouldNotHandleBroadcast);
    assert_eq!(
        target.errors[0].message(),
        "No activity found to handle consent intent: no consent activity"
    );
}

#[test]
fn test_dispatch_without_launcher() {
    let host = MockHost::live();
    let handler = handler(&host);
    let mut target = RecordingTarget {
        launch_error: Some(LaunchError::NoLauncher),
        ..Default::default()
    };

    handler.dispatch(ConsentOutcome::Success(ConsentHandle::new("H")), &mut target);

    assert_eq!(
        target.errors,
        vec![ConsentError::new(
            ErrorCode::CouldNotHandleBroadcast,
            "Launcher is null"
        )]
    );
}

#[test]
fn test_dispatch_timeout() {
    let host = MockHost::live();
    let handler = handler(&host);
    let mut target = RecordingTarget::default();

    handler.dispatch(ConsentOutcome::Timeout, &mut target);

    assert_eq!(target.errors, vec![ConsentError::from(ErrorCode::ConsentTimeout)]);
}

#[test]
fn test_dispatch_malformed() {
    let host = MockHost::live();
    let handler = handler(&host);
    let mut target = RecordingTarget::default();

    handler.dispatch(
        ConsentOutcome::MalformedEvent("Consent intent is null".into()),
        &mut target,
    );

    assert_eq!(
        target.errors,
        vec![ConsentError::new(
            ErrorCode::CouldNotHandleBroadcast,
            "Consent intent is null"
        )]
    );
}
