pub mod categorize;
pub mod outputs;
pub mod providers;
pub mod webhook;

pub use webhook::WebhookRelay;
