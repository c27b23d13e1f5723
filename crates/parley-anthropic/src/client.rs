// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API.
//!
//! Provides [`AnthropicClient`] which handles authentication, sends exactly
//! one request per call, and classifies failures. Retrying is left to the
//! dispatcher.

use std::time::Duration;

use parley_core::{FailureKind, ParleyError, ProviderFailure};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::types::{ApiErrorResponse, MessageRequest, MessageResponse};

/// HTTP client for Anthropic API communication.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnthropicClient {
    /// Creates a new Anthropic API client.
    ///
    /// # Arguments
    /// * `api_key` - Anthropic API key, sent as `x-api-key`
    /// * `api_version` - API version string (e.g., "2023-06-01")
    /// * `base_url` - Messages endpoint
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_key: &SecretString,
        api_version: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ParleyError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| ParleyError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                ParleyError::Config(format!("invalid API version header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ParleyError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends one non-streaming request and returns the full response.
    pub async fn complete_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ProviderFailure> {
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        debug!(status = %status, "anthropic response received");

        if status.is_success() {
            let body = response.text().await.map_err(classify_transport_error)?;
            return serde_json::from_str(&body).map_err(|e| {
                ProviderFailure::new(
                    FailureKind::Unknown,
                    format!("failed to parse Anthropic response: {e}"),
                )
            });
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!(
                "Anthropic API error ({}): {}",
                api_err.error.type_, api_err.error.message
            ),
            Err(_) => format!("Anthropic API returned {status}: {body}"),
        };

        Err(ProviderFailure::from_response(
            status.as_u16(),
            retry_after.as_deref(),
            message,
        ))
    }
}

fn classify_transport_error(e: reqwest::Error) -> ProviderFailure {
    ProviderFailure::transport(e.is_timeout(), e.is_connect(), e)
}
