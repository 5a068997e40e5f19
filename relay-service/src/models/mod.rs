pub mod cycle;

pub use cycle::{CycleResponse, WebhookPayload, WebhookStatus};
