#![allow(dead_code)]

use relay_service::config::{GrokConfig, RelayConfig, ZapierConfig};
use relay_service::startup::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;

pub const TEST_API_KEY: &str = "xai-test-key";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

/// Knobs for a spawned test app. Upstream URLs usually point at wiremock servers.
pub struct TestAppOptions {
    pub grok_api_base: String,
    pub api_key: Option<String>,
    pub webhook_url: Option<String>,
    pub grok_timeout_secs: u64,
}

impl TestAppOptions {
    pub fn new(grok_api_base: impl Into<String>) -> Self {
        Self {
            grok_api_base: grok_api_base.into(),
            api_key: Some(TEST_API_KEY.to_string()),
            webhook_url: None,
            grok_timeout_secs: 5,
        }
    }

    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn with_grok_timeout(mut self, secs: u64) -> Self {
        self.grok_timeout_secs = secs;
        self
    }

    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }
}

impl TestApp {
    pub async fn spawn(options: TestAppOptions) -> Self {
        let config = RelayConfig {
            common: CoreConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
                ..Default::default()
            },
            environment: "test".to_string(),
            grok: GrokConfig {
                api_key: options.api_key.map(Secret::new),
                api_base: options.grok_api_base,
                timeout_secs: options.grok_timeout_secs,
                ..Default::default()
            },
            zapier: ZapierConfig {
                webhook_url: options.webhook_url,
                timeout_secs: 2,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.http_port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling the status endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp { address, client }
    }

    pub async fn run_cycle(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/run_cycle", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// A chat-completions body whose first choice says `content`.
pub fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "grok-beta",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
    })
}
