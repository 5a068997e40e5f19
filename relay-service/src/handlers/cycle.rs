use crate::models::{CycleResponse, WebhookPayload, WebhookStatus};
use crate::services::categorize::{self, Categorized};
use crate::services::outputs;
use crate::services::providers::{GenerationParams, ProviderError};
use crate::startup::AppState;
use axum::{extract::State, Json};
use serde_json::{Map, Value};
use service_core::error::AppError;

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => AppError::ConfigError(anyhow::anyhow!(msg)),
            ProviderError::RateLimited { retry_after } => AppError::TooManyRequests(
                "Generation service rate limited the request".to_string(),
                retry_after,
            ),
            ProviderError::Timeout => {
                AppError::GatewayTimeout("Generation service timed out".to_string())
            }
            other => AppError::BadGateway(format!("Generation service failed: {}", other)),
        }
    }
}

/// `POST /run_cycle`: categorise the request with Grok and relay the result.
pub async fn run_cycle(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<CycleResponse>, AppError> {
    let Value::Object(request) = body else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Request body must be a JSON object"
        )));
    };

    state.text_provider.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Generation service is not configured");
        AppError::from(e)
    })?;

    let result = generate(&state, &request).await?;

    let outputs = categorize::parse_categorized(&result).map(|categorized| {
        outputs::build_outputs(
            &categorized,
            &outputs::raw_titles(&request),
            &outputs::user_profiles(&request),
        )
    });
    if outputs.is_none() {
        tracing::info!("Generation reply is not categorised JSON; relaying text only");
    }

    let webhook_status = state
        .webhook
        .deliver(&WebhookPayload {
            result: &result,
            outputs: outputs.as_ref(),
        })
        .await;

    tracing::info!(
        webhook_sent = ?webhook_status.as_ref().map(WebhookStatus::is_sent),
        webhook_status = ?webhook_status.as_ref().map(|s| s.to_string()),
        "Automation cycle completed"
    );

    Ok(Json(CycleResponse {
        result,
        webhook_status,
        outputs,
    }))
}

/// An explicitly empty `raw_data` list has nothing to categorise.
async fn generate(state: &AppState, request: &Map<String, Value>) -> Result<String, AppError> {
    if request
        .get("raw_data")
        .and_then(Value::as_array)
        .is_some_and(|items| items.is_empty())
    {
        tracing::info!("Empty raw_data; skipping generation");
        return Ok(Categorized::empty_json());
    }

    let messages = categorize::build_messages(request);
    let response = state
        .text_provider
        .generate(&messages, &GenerationParams::default())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Generation call failed");
            AppError::from(e)
        })?;

    tracing::info!(
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "Generation call completed"
    );

    Ok(response.text)
}
