//! Application startup and lifecycle management.

use crate::config::RelayConfig;
use crate::handlers;
use crate::services::providers::grok::GrokTextProvider;
use crate::services::providers::TextProvider;
use crate::services::WebhookRelay;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: RelayConfig,
    pub text_provider: Arc<dyn TextProvider>,
    pub webhook: WebhookRelay,
}

/// Build the HTTP router for the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/run_cycle", post(handlers::run_cycle))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let text_provider: Arc<dyn TextProvider> = Arc::new(
            GrokTextProvider::new(config.grok.clone())
                .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?,
        );

        if config.grok.has_api_key() {
            tracing::info!(
                model = %config.grok.model,
                api_base = %config.grok.api_base,
                "Initialized Grok text provider"
            );
        } else if config.is_prod() {
            tracing::error!("GROK_API_KEY is not set; /run_cycle will reject every request");
        } else {
            tracing::warn!("GROK_API_KEY is not set; /run_cycle will reject every request");
        }

        let webhook = WebhookRelay::new(
            config.zapier.webhook_url.clone(),
            Duration::from_secs(config.zapier.timeout_secs),
        )
        .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;

        if webhook.is_configured() {
            tracing::info!("Webhook relay enabled");
        } else {
            tracing::info!("ZAPIER_WEBHOOK_URL is not set; results will not be relayed");
        }

        let state = AppState {
            config: config.clone(),
            text_provider,
            webhook,
        };

        // Port 0 = random port for testing
        let http_addr = config.common.bind_address();
        let http_listener = TcpListener::bind(http_addr.as_str()).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", http_addr, e);
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!("Relay service: HTTP on port {}", http_port);

        Ok(Self {
            http_port,
            http_listener,
            state,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.http_listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
