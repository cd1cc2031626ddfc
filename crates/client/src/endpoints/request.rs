//! Retry helper for HTTP requests with exponential backoff.
//!
//! Requests that fail with HTTP 429 (Too Many Requests) are retried with
//! exponential backoff. Every other non-success status is turned into
//! [`ClientError::ApiError`] carrying Grafana's error message.

use std::time::Instant;

use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Grafana's JSON error body, e.g. `{"message": "Dashboard not found"}`.
#[derive(Debug, Deserialize)]
struct GrafanaErrorBody {
    message: String,
}

/// Sends an HTTP request with automatic retry logic for HTTP 429 responses.
///
/// - Backoff is exponential: 1s, 2s, 4s (2^attempt seconds).
/// - `max_retries` of 0 sends the request exactly once.
/// - Each attempt is recorded on `metrics` when provided.
///
/// # Errors
///
/// Returns `ClientError::MaxRetriesExceeded` when every attempt was rate limited,
/// `ClientError::ApiError` for other non-success statuses and
/// `ClientError::HttpError` for transport failures.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None => {
                debug!("Cannot clone request builder for retry");
                return Err(ClientError::MaxRetriesExceeded(attempt));
            }
        };

        if let Some(m) = metrics {
            m.record_request(endpoint, method);
            if attempt > 0 {
                m.record_retry(endpoint, method, attempt);
            }
        }

        let started = Instant::now();
        let sent = attempt_builder.send().await;
        let status = sent.as_ref().ok().map(|r| r.status().as_u16());
        if let Some(m) = metrics {
            m.record_request_duration(endpoint, method, started.elapsed(), status);
        }

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                let err = ClientError::from(e);
                if let Some(m) = metrics {
                    m.record_client_error(endpoint, method, &err);
                }
                return Err(err);
            }
        };

        if response.status().as_u16() == 429 {
            if attempt < max_retries {
                let backoff_secs = 2u64.pow(attempt as u32);
                debug!(
                    endpoint,
                    attempt = attempt + 1,
                    max_retries = max_retries + 1,
                    backoff_secs,
                    "Rate limited (HTTP 429), retrying with exponential backoff"
                );
                tokio::time::sleep(tokio::time::Duration::from_secs(backoff_secs)).await;
                continue;
            }
            debug!(
                endpoint,
                attempts = attempt + 1,
                "Max retries exhausted for rate-limited request"
            );
            let err = ClientError::MaxRetriesExceeded(max_retries + 1);
            if let Some(m) = metrics {
                m.record_client_error(endpoint, method, &err);
            }
            return Err(err);
        }

        if response.status().is_success() {
            if attempt > 0 {
                debug!(endpoint, attempt = attempt + 1, "Request succeeded after retry");
            }
            return Ok(response);
        }

        let err = api_error(response).await;
        if let Some(m) = metrics {
            m.record_client_error(endpoint, method, &err);
        }
        return Err(err);
    }

    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let request_id = response
        .headers()
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let message = match serde_json::from_str::<GrafanaErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) => body,
    };

    ClientError::ApiError {
        status,
        url,
        message,
        request_id,
    }
}

/// Decode a successful response body, mapping shape mismatches to `InvalidResponse`.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse {what}: {e}")))
}
