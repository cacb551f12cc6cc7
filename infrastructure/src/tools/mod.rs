//! Analysis tools and their executor
//!
//! | Tool | Upstream | Module |
//! |------|----------|--------|
//! | `firecrawler` | Firecrawl scrape API | [`firecrawler`] |
//! | `serp_analysis` | SerpAPI Google search | [`serp`] |
//! | `category_tree` | local taxonomy file | [`category_tree`] |
//!
//! Each module exposes its name constant, a `*_definition()` and an async
//! `execute_*()` that turns every failure into a failed [`ToolResult`].
//! [`AnalysisToolExecutor`] validates calls and dispatches on [`ToolKind`].
//!
//! [`ToolResult`]: andy_domain::ToolResult
//! [`ToolKind`]: andy_domain::ToolKind

pub mod category_tree;
pub mod firecrawler;
pub mod serp;

mod executor;
mod schema;

pub use executor::{AnalysisToolExecutor, ToolSettings};
pub use schema::JsonSchemaToolConverter;

use andy_domain::tool::{ToolError, ToolSpec};

/// Base URL and credentials of a keyed HTTP API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEndpoint {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Variable the key is read from, for error messages
    pub api_key_env: String,
}

impl ApiEndpoint {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            api_key_env: api_key_env.into(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The API key, or the configuration error reported when it is missing
    pub fn require_key(&self) -> Result<&str, ToolError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| self.missing_key_error())
    }

    pub fn missing_key_error(&self) -> ToolError {
        ToolError::configuration(format!(
            "{} is not set. Add it to your environment or .env file.",
            self.api_key_env
        ))
    }
}

/// Definitions of all three tools, in pipeline order
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(firecrawler::firecrawler_definition())
        .register(serp::serp_analysis_definition())
        .register(category_tree::category_tree_definition())
}

#[cfg(test)]
mod tests {
    use super::*;
    use andy_domain::{ToolErrorKind, ToolKind};

    #[test]
    fn test_default_tool_spec_order() {
        let names: Vec<_> = default_tool_spec().names().map(str::to_string).collect();
        let expected: Vec<_> = ToolKind::ALL.iter().map(|k| k.as_str().to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_endpoint_key() {
        let endpoint = ApiEndpoint::new("https://api.firecrawl.dev/", None, "FIRECRAWL_API_KEY");
        assert_eq!(endpoint.url("/v1/scrape"), "https://api.firecrawl.dev/v1/scrape");

        let err = endpoint.require_key().unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::Configuration);
        assert!(err.message.starts_with("FIRECRAWL_API_KEY is not set"));
    }
}
