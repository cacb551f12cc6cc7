//! Analysis tool executor: the concrete implementation of [`ToolExecutorPort`].
//!
//! ```text
//! ToolExecutorPort::execute()
//!   ├─ unknown name        → NotFound
//!   ├─ DefaultToolValidator → Validation
//!   └─ match ToolKind
//!        ├─ Firecrawler  → firecrawler::execute_firecrawler  (reqwest)
//!        ├─ SerpAnalysis → serp::execute_serp_analysis       (reqwest)
//!        └─ CategoryTree → category_tree::execute_category_tree (in memory)
//! ```
//!
//! The executor holds one shared `reqwest::Client` with the configured
//! timeout, and the taxonomy behind an `Arc`. Every result gets its
//! execution time stamped into the metadata.

use super::serp::SerpEndpoint;
use super::{ApiEndpoint, category_tree, firecrawler, serp};
use andy_application::ports::tool_executor::{ToolAvailability, ToolExecutorPort};
use andy_domain::tool::{
    DefaultToolValidator, ToolCall, ToolError, ToolKind, ToolResult, ToolSpec, ToolValidator,
};
use andy_domain::CategoryTaxonomy;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Endpoints and limits the tools need
#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub firecrawl: ApiEndpoint,
    pub serpapi: SerpEndpoint,
    pub request_timeout: Duration,
}

/// Executor for the three analysis tools.
#[derive(Debug, Clone)]
pub struct AnalysisToolExecutor {
    tool_spec: ToolSpec,
    settings: ToolSettings,
    /// Loaded taxonomy, or why it could not be loaded
    taxonomy: Result<Arc<CategoryTaxonomy>, String>,
    http_client: reqwest::Client,
}

impl AnalysisToolExecutor {
    pub fn new(
        settings: ToolSettings,
        taxonomy: Result<Arc<CategoryTaxonomy>, String>,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(concat!("AudienceAndy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            tool_spec: super::default_tool_spec(),
            settings,
            taxonomy,
            http_client,
        })
    }

    pub fn taxonomy(&self) -> Option<&Arc<CategoryTaxonomy>> {
        self.taxonomy.as_ref().ok()
    }

    fn unavailable_reason(&self, kind: ToolKind) -> Option<String> {
        match kind {
            ToolKind::Firecrawler => self
                .settings
                .firecrawl
                .require_key()
                .err()
                .map(|e| e.message),
            ToolKind::SerpAnalysis => self
                .settings
                .serpapi
                .api
                .require_key()
                .err()
                .map(|e| e.message),
            ToolKind::CategoryTree => self.taxonomy.as_ref().err().cloned(),
        }
    }

    async fn dispatch(&self, kind: ToolKind, call: &ToolCall) -> ToolResult {
        match kind {
            ToolKind::Firecrawler => {
                firecrawler::execute_firecrawler(&self.http_client, &self.settings.firecrawl, call)
                    .await
            }
            ToolKind::SerpAnalysis => {
                serp::execute_serp_analysis(&self.http_client, &self.settings.serpapi, call).await
            }
            ToolKind::CategoryTree => match &self.taxonomy {
                Ok(taxonomy) => category_tree::execute_category_tree(taxonomy, call),
                Err(reason) => ToolResult::failure(
                    &call.tool_name,
                    ToolError::configuration(format!(
                        "Category tree tool is not available: {}",
                        reason
                    )),
                ),
            },
        }
    }
}

#[async_trait]
impl ToolExecutorPort for AnalysisToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    fn availability(&self) -> Vec<ToolAvailability> {
        ToolKind::ALL
            .into_iter()
            .map(|kind| match self.unavailable_reason(kind) {
                None => ToolAvailability::ready(kind),
                Some(reason) => ToolAvailability::unavailable(kind, reason),
            })
            .collect()
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let (Some(kind), Some(definition)) = (
            ToolKind::from_name(&call.tool_name),
            self.tool_spec.get(&call.tool_name),
        ) else {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(format!("tool '{}'", call.tool_name)),
            );
        };

        if let Err(e) = DefaultToolValidator.validate(call, definition) {
            return ToolResult::failure(&call.tool_name, e);
        }

        let result = self.dispatch(kind, call).await;
        if let Some(err) = result.error() {
            warn!(tool = %kind, error = %err, "Tool execution failed");
        }
        result.with_duration(start.elapsed().as_millis() as u64)
    }
}
