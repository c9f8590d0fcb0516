use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::dto::SensorReadingDto;

// ---------------------------------------------------------------------------
// Response envelope
//
// Success: { "success": true, "data": [...] }
// Failure: { "success": false, "message": "..." }
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    success: bool,
    data: Option<Vec<SensorReadingDto>>,
    message: Option<String>,
}

impl ListEnvelope {
    fn into_result(self) -> Result<Vec<SensorReadingDto>> {
        if self.success {
            self.data
                .ok_or_else(|| anyhow!("sensor API: success=true but data field is missing"))
        } else {
            Err(anyhow!(
                "sensor API error: {}",
                self.message.as_deref().unwrap_or("(no message)")
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. `0` behaves as `1`.
    pub attempts: u32,
    /// Fixed pause between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn once() -> Self {
        Self {
            attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardClient
// ---------------------------------------------------------------------------

/// Reads the full reading list from a running service.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// One `GET /api/sensors`. Non-2xx statuses and `success: false`
    /// envelopes are errors.
    pub async fn fetch_readings(&self) -> Result<Vec<SensorReadingDto>> {
        let url = format!("{}/api/sensors", self.inner.base_url);
        debug!(url = %url, "Fetching sensor readings");

        let response = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .context("sensor list request failed")?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .context("failed to read sensor list response body")?;
        let envelope = serde_json::from_slice::<ListEnvelope>(&bytes);

        if !status.is_success() {
            let message = envelope
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| "(no message)".to_owned());
            bail!("sensor API returned {status}: {message}");
        }

        envelope
            .context("failed to deserialize sensor list response")?
            .into_result()
    }

    /// `fetch_readings` with a fixed-backoff retry. Returns the last error
    /// once every attempt has failed.
    pub async fn fetch_with_retry(&self, policy: RetryPolicy) -> Result<Vec<SensorReadingDto>> {
        let attempts = policy.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.fetch_readings().await {
                Ok(readings) => return Ok(readings),
                Err(e) if attempt < attempts => {
                    warn!(attempt, attempts, error = %e, "Fetch failed, retrying");
                    tokio::time::sleep(policy.backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e.context(format!("giving up after {attempts} attempt(s)")))
                }
            }
        }
    }
}
