use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

const DEFAULT_GROK_API_BASE: &str = "https://api.x.ai/v1";
const DEFAULT_GROK_MODEL: &str = "grok-beta";
const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_GROK_TIMEOUT_SECS: u64 = 120;
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub environment: String,
    pub grok: GrokConfig,
    pub zapier: ZapierConfig,
}

#[derive(Debug, Clone)]
pub struct GrokConfig {
    /// Missing keys are not fatal at startup; `/run_cycle` refuses to run without one.
    pub api_key: Option<Secret<String>>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ZapierConfig {
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

impl GrokConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }
}

impl Default for GrokConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_GROK_API_BASE.to_string(),
            model: DEFAULT_GROK_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_GROK_TIMEOUT_SECS,
        }
    }
}

impl Default for ZapierConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
        }
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(RelayConfig {
            common: common_config,
            environment: get_env("ENVIRONMENT", "dev"),
            grok: GrokConfig {
                api_key: get_optional_env("GROK_API_KEY").map(Secret::new),
                api_base: get_env("GROK_API_BASE", DEFAULT_GROK_API_BASE),
                model: get_env("GROK_MODEL", DEFAULT_GROK_MODEL),
                temperature: parse_env("GROK_TEMPERATURE", DEFAULT_TEMPERATURE)?,
                timeout_secs: parse_env("GROK_TIMEOUT_SECS", DEFAULT_GROK_TIMEOUT_SECS)?,
            },
            zapier: ZapierConfig {
                webhook_url: get_optional_env("ZAPIER_WEBHOOK_URL"),
                timeout_secs: parse_env("ZAPIER_TIMEOUT_SECS", DEFAULT_WEBHOOK_TIMEOUT_SECS)?,
            },
        })
    }

    pub fn is_prod(&self) -> bool {
        self.environment == "prod"
    }
}

fn get_env(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn get_optional_env(key: &str) -> Option<String> {
    non_blank(env::var(key).ok())
}

/// Blank values count as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
