// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Parley.
//!
//! Provider adapters classify every failed call into a [`FailureKind`] and
//! return a [`ProviderFailure`]. The resilient dispatcher is the only code
//! that decides whether to retry; everything above it sees [`ParleyError`].

use std::fmt;
use std::time::Duration;

use strum::Display;
use thiserror::Error;

/// Classification of a failed provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// The vendor signaled throttling (HTTP 429 or equivalent).
    RateLimited,
    /// Network or connection failure, timeout, or vendor overload.
    Transient,
    /// Credentials were rejected. Never retried.
    AuthFailed,
    /// The payload was rejected as malformed. Never retried.
    InvalidRequest,
    /// Anything else. Retried conservatively.
    Unknown,
}

impl FailureKind {
    /// Whether a failure of this kind may succeed on a later attempt.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            FailureKind::RateLimited | FailureKind::Transient | FailureKind::Unknown
        )
    }

    /// Classify an HTTP status code returned by a vendor endpoint.
    ///
    /// Only meaningful for non-success statuses.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => FailureKind::AuthFailed,
            400 | 404 | 405 | 413 | 422 => FailureKind::InvalidRequest,
            429 => FailureKind::RateLimited,
            408 | 500 | 502 | 503 | 504 | 529 => FailureKind::Transient,
            _ => FailureKind::Unknown,
        }
    }

    /// Classify a failure that happened before any status was received.
    pub fn from_transport(timed_out: bool, connect_failed: bool) -> Self {
        if timed_out || connect_failed {
            FailureKind::Transient
        } else {
            FailureKind::Unknown
        }
    }
}

/// A classified provider failure, as surfaced by an adapter.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct ProviderFailure {
    pub kind: FailureKind,
    pub message: String,
    /// HTTP status, when the failure came from a vendor response.
    pub status: Option<u16>,
    /// Vendor-requested wait before retrying (`Retry-After`).
    pub retry_after: Option<Duration>,
}

impl ProviderFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            retry_after: None,
        }
    }

    /// Build a failure from a non-success HTTP status, classifying it.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::from_status(status),
            message: message.into(),
            status: Some(status),
            retry_after: None,
        }
    }

    /// Build a failure from a non-success response: its status, raw
    /// `Retry-After` header value, and the vendor's error message.
    pub fn from_response(
        status: u16,
        retry_after: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self::from_status(status, message).with_retry_after(retry_after.and_then(parse_retry_after))
    }

    /// Build a failure for a request that never produced a response.
    pub fn transport(timed_out: bool, connect_failed: bool, detail: impl fmt::Display) -> Self {
        Self::new(
            FailureKind::from_transport(timed_out, connect_failed),
            format!("HTTP request failed: {detail}"),
        )
    }

    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Parse an HTTP `Retry-After` value given in (possibly fractional) seconds.
///
/// The HTTP-date form is not supported and yields `None`. Values too large
/// for a `Duration` saturate to `Duration::MAX`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    (secs.is_finite() && secs >= 0.0)
        .then(|| Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

/// The primary error type used across Parley crates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParleyError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A user message was empty after trimming.
    #[error("message is empty")]
    EmptyMessage,

    /// A model id has no entry in the price table.
    #[error("no pricing registered for model `{model}`")]
    UnknownModel { model: String },

    /// The requested provider has no configured adapter.
    #[error("provider `{provider}` is not configured (missing API key?)")]
    ProviderUnavailable { provider: String },

    /// A non-retryable provider failure, surfaced without retry.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderFailure),

    /// Retry policy exhausted; carries the last underlying cause.
    #[error("gave up after {attempts} attempts: {last}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last: ProviderFailure,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// The provider failure at the root of this error, if any.
    pub fn provider_failure(&self) -> Option<&ProviderFailure> {
        match self {
            ParleyError::Provider(f) => Some(f),
            ParleyError::RetryExhausted { last, .. } => Some(last),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_kinds() {
        assert!(FailureKind::RateLimited.is_retryable());
        assert!(FailureKind::Transient.is_retryable());
        assert!(FailureKind::Unknown.is_retryable());
        assert!(!FailureKind::AuthFailed.is_retryable());
        assert!(!FailureKind::InvalidRequest.is_retryable());
    }

    #[test]
    fn status_classification() {
        assert_eq!(FailureKind::from_status(401), FailureKind::AuthFailed);
        assert_eq!(FailureKind::from_status(403), FailureKind::AuthFailed);
        assert_eq!(FailureKind::from_status(400), FailureKind::InvalidRequest);
        assert_eq!(FailureKind::from_status(422), FailureKind::InvalidRequest);
        assert_eq!(FailureKind::from_status(429), FailureKind::RateLimited);
        assert_eq!(FailureKind::from_status(503), FailureKind::Transient);
        assert_eq!(FailureKind::from_status(529), FailureKind::Transient);
        assert_eq!(FailureKind::from_status(418), FailureKind::Unknown);
    }

    #[test]
    fn transport_classification() {
        assert_eq!(FailureKind::from_transport(true, false), FailureKind::Transient);
        assert_eq!(FailureKind::from_transport(false, true), FailureKind::Transient);
        assert_eq!(FailureKind::from_transport(false, false), FailureKind::Unknown);

        let f = ProviderFailure::transport(false, true, "connection refused");
        assert_eq!(f.kind, FailureKind::Transient);
        assert_eq!(f.message, "HTTP request failed: connection refused");
        assert_eq!(f.status, None);
    }

    #[test]
    fn response_failure_carries_status_and_hint() {
        let f = ProviderFailure::from_response(429, Some("2"), "slow down");
        assert_eq!(f.kind, FailureKind::RateLimited);
        assert_eq!(f.status, Some(429));
        assert_eq!(f.retry_after, Some(Duration::from_secs(2)));

        let huge = ProviderFailure::from_response(503, Some("1e30"), "overloaded");
        assert_eq!(huge.kind, FailureKind::Transient);
        assert_eq!(huge.retry_after, Some(Duration::MAX));

        let none = ProviderFailure::from_response(401, None, "bad key");
        assert_eq!(none.retry_after, None);
    }

    #[test]
    fn failure_display_names_kind() {
        let f = ProviderFailure::from_status(429, "slow down");
        assert_eq!(f.to_string(), "rate_limited: slow down");
        assert_eq!(f.status, Some(429));
    }

    #[test]
    fn retry_after_seconds() {
        assert_eq!(parse_retry_after("3"), Some(Duration::from_secs(3)));
        assert_eq!(parse_retry_after(" 0.5 "), Some(Duration::from_millis(500)));
        assert_eq!(parse_retry_after("-1"), None);
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn retry_after_beyond_duration_range_saturates() {
        assert_eq!(parse_retry_after("1e30"), Some(Duration::MAX));
        assert_eq!(
            parse_retry_after("99999999999999999999"),
            Some(Duration::MAX)
        );
        assert_eq!(parse_retry_after("inf"), None);
        assert_eq!(parse_retry_after("NaN"), None);
    }

    #[test]
    fn exhausted_error_exposes_last_cause() {
        let last = ProviderFailure::new(FailureKind::Transient, "connection reset");
        let err = ParleyError::RetryExhausted {
            attempts: 3,
            last: last.clone(),
        };
        assert_eq!(err.provider_failure(), Some(&last));
        assert!(err.to_string().contains("3 attempts"));
        assert!(err.to_string().contains("connection reset"));
    }
}
