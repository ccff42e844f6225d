// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! smsotp Mobile Bindings
//!
//! UniFFI bindings for Android and iOS platforms.
//! Exposes the consent listener and OTP helpers on top of smsotp-core.

use once_cell::sync::OnceCell;
use smsotp_core::{ErrorCode, OtpExtractor};
use tracing_subscriber::EnvFilter;

// === Modules ===

mod error;
mod listener;
mod platform;
mod types;

// Re-export public types
pub use error::MobileError;
pub use listener::MobileConsentListener;
pub use platform::{ConsentCallback, PlatformConsentHost, PlatformConsentLauncher};
pub use types::{
    MobileBroadcastEvent, MobileConsentConfig, MobileErrorCode, MobileEventExtras,
    MobileLaunchResult, MobileRegistration, MobileSessionStatus,
};

uniffi::setup_scaffolding!();

/// Log filter used when the caller passes an empty one.
const DEFAULT_LOG_FILTER: &str = "smsotp_core=info,smsotp_mobile=info";

static LOGGING: OnceCell<()> = OnceCell::new();

// === Logging ===

/// Install the tracing subscriber.
///
/// `filter` uses `RUST_LOG` syntax. Only the first call has an effect.
/// Returns true if this call installed the subscriber.
#[uniffi::export]
pub fn init_logging(filter: String) -> bool {
    let mut installed = false;
    LOGGING.get_or_init(|| {
        let filter = if filter.is_empty() {
            DEFAULT_LOG_FILTER
        } else {
            filter.as_str()
        };
        let filter =
            EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok();
    });
    installed
}

// === OTP ===

/// Extract a one-time passcode of `length` digits from SMS text.
///
/// Returns None if the text does not contain enough digits.
#[uniffi::export]
pub fn extract_otp(sms: String, length: u32) -> Option<String> {
    OtpExtractor::new(length as usize).extract(&sms)
}

/// Check that `code` is exactly `length` ASCII digits.
#[uniffi::export]
pub fn is_valid_otp(code: String, length: u32) -> bool {
    smsotp_core::is_valid_otp(&code, length as usize)
}

// === Error codes ===

/// Stable numeric code reported to hosts, e.g. "1001".
#[uniffi::export]
pub fn error_code_number(code: MobileErrorCode) -> String {
    ErrorCode::from(code).code().to_string()
}

/// Stable symbolic name, e.g. "NULL_ACTIVITY".
#[uniffi::export]
pub fn error_code_name(code: MobileErrorCode) -> String {
    ErrorCode::from(code).as_str().to_string()
}

/// Default message for an error code.
#[uniffi::export]
pub fn error_code_message(code: MobileErrorCode) -> String {
    ErrorCode::from(code).message().to_string()
}
