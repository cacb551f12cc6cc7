//! Mock ports shared by the presentation tests

use andy_application::{
    ChatOptions, GatewayError, LlmGateway, ToolAvailability, ToolExecutorPort, WorkflowOrchestrator,
    WorkflowParams,
};
use andy_domain::{Message, ProductData, ToolCall, ToolError, ToolKind, ToolResult, ToolSpec};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct MockGateway;

#[async_trait]
impl LlmGateway for MockGateway {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn chat(
        &self,
        _messages: &[Message],
        _options: &ChatOptions,
    ) -> Result<String, GatewayError> {
        Ok("1. Target trail runners".to_string())
    }
}

/// Scraping succeeds, everything after it fails
pub struct MockTools {
    spec: ToolSpec,
}

#[async_trait]
impl ToolExecutorPort for MockTools {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn availability(&self) -> Vec<ToolAvailability> {
        vec![
            ToolAvailability::ready(ToolKind::Firecrawler),
            ToolAvailability::unavailable(ToolKind::SerpAnalysis, "SERPAPI_KEY is not set"),
            ToolAvailability::ready(ToolKind::CategoryTree),
        ]
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        match ToolKind::from_name(&call.tool_name) {
            Some(ToolKind::Firecrawler) => {
                let product = ProductData {
                    url: call.get_string("url").unwrap_or_default().to_string(),
                    title: Some("Acme Lamp".to_string()),
                    description: Some("A warm desk lamp".to_string()),
                    ..Default::default()
                };
                ToolResult::success(&call.tool_name, json!({ "product": product, "warnings": [] }))
            }
            _ => ToolResult::failure(
                &call.tool_name,
                ToolError::configuration("SERPAPI_KEY is not set"),
            ),
        }
    }
}

pub fn orchestrator() -> WorkflowOrchestrator {
    WorkflowOrchestrator::new(
        Arc::new(MockGateway),
        Arc::new(MockTools {
            spec: ToolSpec::new(),
        }),
        WorkflowParams::default(),
    )
}
