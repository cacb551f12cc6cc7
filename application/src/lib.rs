//! Application layer for audience-andy
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::WorkflowParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{ChatOptions, GatewayError, LlmGateway},
    tool_executor::{ToolAvailability, ToolExecutorPort},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::run_workflow::{
    SessionStatus, WorkflowOrchestrator, WorkflowReply, WorkflowStatus,
};
