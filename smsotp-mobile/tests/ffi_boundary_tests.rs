// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! FFI Boundary Tests
//!
//! Tests the FFI boundary between Rust and mobile platforms.
//! Focuses on type conversions and standalone functions.
//!
//! Note: Tests driving MobileConsentListener are in src/listener.rs as
//! inline tests because they inspect its outbox.

use smsotp_mobile::{
    error_code_message, error_code_name, error_code_number, extract_otp, init_logging,
    is_valid_otp, MobileConsentConfig, MobileErrorCode,
};

// ============================================================================
// OTP Tests
// ============================================================================

#[test]
fn test_extract_otp() {
    assert_eq!(
        extract_otp("Your verification code is 4821".to_string(), 4),
        Some("4821".to_string())
    );
    assert_eq!(extract_otp("no digits".to_string(), 4), None);
}

#[test]
fn test_is_valid_otp() {
    assert!(is_valid_otp("1234".to_string(), 4));
    assert!(!is_valid_otp("12345".to_string(), 4));
}

// ============================================================================
// Error Code Tests
// ============================================================================

#[test]
fn test_error_code_numbers() {
    assert_eq!(error_code_number(MobileErrorCode::NullActivity), "1001");
    assert_eq!(error_code_number(MobileErrorCode::SmsRetrieverError), "1002");
    assert_eq!(error_code_number(MobileErrorCode::NullBroadcastReceiver), "1003");
    assert_eq!(error_code_number(MobileErrorCode::CouldNotHandleBroadcast), "1004");
    assert_eq!(error_code_number(MobileErrorCode::RegistrationError), "1005");
    assert_eq!(error_code_number(MobileErrorCode::MaxRetriesReached), "1006");
    assert_eq!(error_code_number(MobileErrorCode::UnknownError), "1007");
    assert_eq!(error_code_number(MobileErrorCode::ConsentTimeout), "1008");
}

#[test]
fn test_error_code_names() {
    assert_eq!(error_code_name(MobileErrorCode::NullActivity), "NULL_ACTIVITY");
    assert_eq!(
        error_code_name(MobileErrorCode::MaxRetriesReached),
        "MAX_RETRIES_REACHED"
    );
    assert!(!error_code_message(MobileErrorCode::ConsentTimeout).is_empty());
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_default_config_matches_core() {
    let config = MobileConsentConfig::default();
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.initial_delay_ms, 1_000);
    assert_eq!(config.max_delay_ms, 10_000);
    assert_eq!(config.jitter_ms, 1_000);
}

// ============================================================================
// Logging Tests
// ============================================================================

#[test]
fn test_init_logging_is_idempotent() {
    init_logging("smsotp_core=debug".to_string());
    assert!(!init_logging(String::new()));
}
