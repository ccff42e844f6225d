// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! OTP extraction from an approved SMS.

/// Code length used when none is configured.
pub const DEFAULT_OTP_LENGTH: usize = 4;

/// Pulls a numeric one-time passcode out of SMS text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpExtractor {
    length: usize,
}

impl Default for OtpExtractor {
    fn default() -> Self {
        OtpExtractor::new(DEFAULT_OTP_LENGTH)
    }
}

impl OtpExtractor {
    /// Creates an extractor for codes of `length` digits.
    pub fn new(length: usize) -> Self {
        OtpExtractor { length }
    }

    /// Expected code length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Extracts the code.
    ///
    /// Prefers the first standalone run of exactly `length` digits, so
    /// "Your code is 4821, valid for 10 minutes" yields "4821". Falls back
    /// to the first `length` digits anywhere in the text.
    pub fn extract(&self, sms: &str) -> Option<String> {
        if self.length == 0 {
            return None;
        }

        if let Some(run) = digit_runs(sms).find(|run| run.len() == self.length) {
            return Some(run.to_string());
        }

        let digits: String = sms
            .chars()
            .filter(char::is_ascii_digit)
            .take(self.length)
            .collect();
        (digits.len() == self.length).then_some(digits)
    }
}

fn digit_runs(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
}

/// Returns true if `code` is exactly `length` ASCII digits.
pub fn is_valid_otp(code: &str, length: usize) -> bool {
    code.len() == length && code.bytes().all(|b| b.is_ascii_digit())
}
