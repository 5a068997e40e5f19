use crate::services::outputs::ProductOutputs;
use serde::{Serialize, Serializer};
use std::fmt;

/// Outcome of the best-effort webhook relay.
///
/// Serialised as `"sent"` or `"failed: <reason>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookStatus {
    Sent,
    Failed(String),
}

impl WebhookStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, WebhookStatus::Sent)
    }
}

impl fmt::Display for WebhookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookStatus::Sent => f.write_str("sent"),
            WebhookStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

impl Serialize for WebhookStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Body returned by `POST /run_cycle`.
#[derive(Debug, Serialize)]
pub struct CycleResponse {
    pub result: String,
    /// `null` when no webhook is configured.
    pub webhook_status: Option<WebhookStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<ProductOutputs>,
}

/// Body POSTed to the webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub result: &'a str,
    pub outputs: Option<&'a ProductOutputs>,
}
