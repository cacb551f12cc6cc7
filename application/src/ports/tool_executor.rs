//! Tool Executor port
//!
//! Defines the interface for running the workflow tools.

use andy_domain::tool::{ToolCall, ToolDefinition, ToolKind, ToolResult, ToolSpec};
use async_trait::async_trait;
use serde::Serialize;

/// Whether a tool can run, and why not
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolAvailability {
    pub tool: ToolKind,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ToolAvailability {
    pub fn ready(tool: ToolKind) -> Self {
        Self {
            tool,
            available: true,
            reason: None,
        }
    }

    pub fn unavailable(tool: ToolKind, reason: impl Into<String>) -> Self {
        Self {
            tool,
            available: false,
            reason: Some(reason.into()),
        }
    }
}

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Initialization status of every tool
    fn availability(&self) -> Vec<ToolAvailability>;

    /// Validate and execute a tool call.
    ///
    /// Never fails: every problem is reported inside the [`ToolResult`].
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
