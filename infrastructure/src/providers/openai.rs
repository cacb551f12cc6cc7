//! OpenAI chat completions gateway
//!
//! Implements [`LlmGateway`] over `POST {base_url}/v1/chat/completions`.
//! Works with any server speaking the same protocol via `base_url`.

use andy_application::ports::llm_gateway::{ChatOptions, GatewayError, LlmGateway};
use andy_domain::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            api_key_env: api_key_env.into(),
            model: model.into(),
        })
    }

    fn api_key(&self) -> Result<&str, GatewayError> {
        self.api_key.as_deref().ok_or_else(|| {
            GatewayError::NotConfigured(format!("{} is not set", self.api_key_env))
        })
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    fn model(&self) -> &str {
        &self.model
    }

    fn check_available(&self) -> Result<(), GatewayError> {
        self.api_key().map(|_| ())
    }

    async fn chat(
        &self,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<String, GatewayError> {
        let api_key = self.api_key()?;
        debug!(model = %self.model, messages = messages.len(), "Sending chat completion");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages,
                temperature: options.temperature,
                max_tokens: options.max_tokens,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            return Err(GatewayError::RequestFailed(format!(
                "{} {}",
                status.as_u16(),
                detail
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::RequestFailed(format!("Unexpected response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GatewayError::EmptyResponse)?;

        info!(model = %self.model, chars = content.len(), "Chat completion received");
        Ok(content)
    }
}
