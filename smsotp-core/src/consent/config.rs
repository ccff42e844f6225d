// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration for the consent listener

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::event::{SEND_PERMISSION, SMS_RETRIEVED_ACTION};
use super::platform::DeliveryFilter;

/// Backoff policy for retrying a failed listener start.
///
/// `delay = min(initial * 2^retry, max) + uniform(0, jitter)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of retries per cycle.
    pub max_retries: u32,
    /// Delay before the first retry (milliseconds).
    pub initial_delay_ms: u64,
    /// Upper bound on the exponential part of the delay (milliseconds).
    pub max_delay_ms: u64,
    /// Upper bound of the random jitter added to each delay (milliseconds).
    pub jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            initial_delay_ms: 1_000,
            max_delay_ms: 10_000,
            jitter_ms: 1_000,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn no_retries() -> Self {
        RetryPolicy {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Exponential part of the delay for the given retry count, without jitter.
    pub fn base_delay(&self, retry: u32) -> Duration {
        let multiplier = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        let delay = self
            .initial_delay_ms
            .saturating_mul(multiplier)
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }

    /// Full delay for the given retry count, including jitter drawn from `rng`.
    pub fn delay_for<R: Rng>(&self, retry: u32, rng: &mut R) -> Duration {
        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rng.gen_range(0..=self.jitter_ms)
        };
        self.base_delay(retry) + Duration::from_millis(jitter)
    }

    /// Largest delay this policy can ever produce.
    pub fn max_total_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms.saturating_add(self.jitter_ms))
    }
}

/// Configuration for [`ConsentListenerController`](super::ConsentListenerController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentConfig {
    /// Backoff policy for listener starts.
    pub retry: RetryPolicy,

    /// Event action the broadcast handler subscribes to.
    pub retrieved_action: String,

    /// Permission the sender must hold for a delivery to be accepted.
    pub send_permission: Option<String>,

    /// Whether the receiver is registered as exported.
    pub exported_receiver: bool,

    /// Restarts allowed in a row without a successful registration.
    pub max_unproductive_restarts: u32,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            retrieved_action: SMS_RETRIEVED_ACTION.to_string(),
            send_permission: Some(SEND_PERMISSION.to_string()),
            exported_receiver: true,
            max_unproductive_restarts: 3,
        }
    }
}

impl ConsentConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the subscribed action.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.retrieved_action = action.into();
        self
    }

    /// Accept deliveries from any sender.
    pub fn without_send_permission(mut self) -> Self {
        self.send_permission = None;
        self
    }

    /// Filter used when subscribing the broadcast handler.
    pub fn delivery_filter(&self) -> DeliveryFilter {
        DeliveryFilter {
            action: self.retrieved_action.clone(),
            permission: self.send_permission.clone(),
            exported: self.exported_receiver,
        }
    }
}
