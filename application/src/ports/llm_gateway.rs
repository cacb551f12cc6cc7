//! LLM Gateway port
//!
//! Defines the interface for communicating with the language model provider.

use andy_domain::Message;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Language model is not configured: {0}")]
    NotConfigured(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,
}

/// Sampling options for a single completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to a chat completion
/// API. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Model identifier used for completions
    fn model(&self) -> &str;

    /// Whether the gateway can serve requests (e.g. an API key is set)
    fn check_available(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    /// Send the conversation and return the assistant's reply
    async fn chat(&self, messages: &[Message], options: &ChatOptions)
    -> Result<String, GatewayError>;
}
