//! Remote reasoning gateway.
//!
//! A thin client over an OpenAI-compatible chat-completions endpoint:
//! one cancellable call per request ("issue request, suspend until
//! response or timeout"), no internal retries. Retries, if wanted, are a
//! caller policy.

use crate::types::{AppError, ChatMessage, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Environment variable holding the gateway credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the gateway base URL.
pub const API_BASE_ENV: &str = "OPENAI_API_BASE";

/// Environment variable overriding the default model.
pub const MODEL_ENV: &str = "ABACUS_MODEL";

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "ABACUS_GATEWAY_TIMEOUT_SECS";

/// Default chat model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default hard timeout for one gateway round-trip, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Configuration for the remote reasoning gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// API credential.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible endpoint.
    pub api_base: String,
    /// Chat model identifier.
    pub model: String,
    /// Hard timeout for each request.
    pub timeout: Duration,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional completion length cap.
    pub max_tokens: Option<u32>,
}

impl GatewayConfig {
    /// Cheap availability probe: true when the credential variable is set
    /// and non-empty. Lets callers treat "feature disabled" as a normal
    /// state instead of an error path.
    pub fn is_available() -> bool {
        std::env::var(API_KEY_ENV)
            .map(|key| !key.is_empty())
            .unwrap_or(false)
    }

    /// Load the gateway configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::Gateway(format!(
                    "{} is not set; the remote reasoning gateway is unavailable",
                    API_KEY_ENV
                ))
            })?;

        let api_base =
            std::env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let model = std::env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = match std::env::var(TIMEOUT_ENV) {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::Config(format!("{} must be a whole number of seconds", TIMEOUT_ENV))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            api_base,
            model,
            timeout: Duration::from_secs(timeout_secs),
            temperature: 0.0,
            max_tokens: None,
        })
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Cap the completion length.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Client abstraction over a hosted text-completion capability.
///
/// Implementations must apply a hard timeout and surface every failure as
/// [`AppError::Gateway`]; they must never retry internally.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send an ordered conversation and return the model's reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// The model identifier this gateway talks to.
    fn model_name(&self) -> &str;
}

/// Gateway over an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiGateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl OpenAiGateway {
    /// Create a gateway from an explicit configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a gateway from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(GatewayConfig::from_env()?))
    }

    /// The configuration this gateway was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn request_body(&self, messages: &[ChatMessage]) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": messages,
        });
        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }

    fn extract_content(payload: &Value) -> Result<String> {
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .ok_or_else(|| {
                AppError::Gateway("response did not include message content".to_string())
            })?;
        if content.is_empty() {
            return Err(AppError::Gateway(
                "response contained empty content".to_string(),
            ));
        }
        Ok(content.to_string())
    }
}

#[async_trait]
impl ChatGateway for OpenAiGateway {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = self.endpoint();
        let body = self.request_body(messages);

        tracing::debug!(model = %self.config.model, messages = messages.len(), "gateway request");

        let request = self.http.post(&url).bearer_auth(&self.config.api_key).json(&body).send();
        let response = tokio::time::timeout(self.config.timeout, request)
            .await
            .map_err(|_| {
                AppError::Gateway(format!(
                    "request timed out after {}s",
                    self.config.timeout.as_secs()
                ))
            })?
            .map_err(|e| AppError::Gateway(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Gateway(format!(
                "request failed ({}): {}",
                status, text
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("failed to parse response: {}", e)))?;

        Self::extract_content(&payload)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GatewayConfig {
        GatewayConfig {
            api_key: "test-key".to_string(),
            api_base: "http://localhost:9".to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    #[test]
    fn test_config_builders() {
        let config = test_config()
            .with_model("gpt-4o-mini")
            .with_temperature(0.1)
            .with_max_tokens(400);

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.max_tokens, Some(400));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let mut config = test_config();
        config.api_base = "http://localhost:1234/v1/".to_string();
        let gateway = OpenAiGateway::new(config);
        assert_eq!(gateway.endpoint(), "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let gateway = OpenAiGateway::new(test_config().with_max_tokens(400));
        let body = gateway.request_body(&[ChatMessage::user("hi")]);

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 400);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_extract_content() {
        let payload = serde_json::json!({
            "choices": [{ "message": { "content": "  42  " } }]
        });
        assert_eq!(OpenAiGateway::extract_content(&payload).unwrap(), "42");

        let missing = serde_json::json!({ "choices": [] });
        assert!(matches!(
            OpenAiGateway::extract_content(&missing),
            Err(AppError::Gateway(_))
        ));

        let empty = serde_json::json!({
            "choices": [{ "message": { "content": "" } }]
        });
        assert!(matches!(
            OpenAiGateway::extract_content(&empty),
            Err(AppError::Gateway(_))
        ));
    }
}
