//! Best-effort outbound webhook (Zapier catch hook).

use crate::models::WebhookStatus;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Rejected(StatusCode),

    #[error("network error: {0}")]
    Network(String),
}

/// Posts results to the configured webhook, if any.
#[derive(Clone)]
pub struct WebhookRelay {
    client: Client,
    url: Option<String>,
}

impl WebhookRelay {
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebhookError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Deliver `payload`. `None` means no webhook is configured and nothing was sent.
    /// Failures are logged and folded into the returned status.
    pub async fn deliver<T: Serialize + ?Sized>(&self, payload: &T) -> Option<WebhookStatus> {
        let url = self.url.as_deref()?;

        let status = match self.post(url, payload).await {
            Ok(()) => {
                tracing::info!("Result relayed to webhook");
                WebhookStatus::Sent
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to relay result to webhook");
                WebhookStatus::Failed(e.to_string())
            }
        };

        Some(status)
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &str, payload: &T) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WebhookError::Timeout
                } else {
                    WebhookError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(WebhookError::Rejected(status))
        }
    }
}
