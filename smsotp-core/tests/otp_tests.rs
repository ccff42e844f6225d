// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for OTP extraction.

use proptest::prelude::*;
use smsotp_core::{is_valid_otp, OtpExtractor};

#[test]
fn test_extract_six_digit_code() {
    let extractor = OtpExtractor::new(6);
    assert_eq!(
        extractor.extract("<#> 123456 is your code. Do not share it. FA+9qCX9VSu"),
        Some("123456".to_string())
    );
}

#[test]
fn test_extract_skips_shorter_runs() {
    let extractor = OtpExtractor::new(4);
    assert_eq!(
        extractor.extract("Step 2 of 3: enter 0042"),
        Some("0042".to_string())
    );
}

#[test]
fn test_extract_no_digits() {
    assert_eq!(OtpExtractor::default().extract("no code here"), None);
}

proptest! {
    #[test]
    fn prop_extracted_code_is_valid(text in ".{0,64}", length in 1usize..8) {
        let extractor = OtpExtractor::new(length);
        if let Some(code) = extractor.extract(&text) {
            prop_assert!(is_valid_otp(&code, length));
        }
    }

    #[test]
    fn prop_embedded_code_is_found(code in "[0-9]{4}", prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
        let text = format!("{} {} {}", prefix, code, suffix);
        prop_assert_eq!(OtpExtractor::new(4).extract(&text), Some(code));
    }
}
