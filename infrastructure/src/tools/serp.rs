//! `serp_analysis` tool: competitors and keywords from Google results.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `query` | string | Yes | Search query, usually the product name |
//! | `results_count` | integer | No | Results to analyze, clamped to 5-20 (default 10) |
//!
//! Results come from SerpAPI's `search.json` with `engine=google`. Only the
//! `organic_results` array is read; its shape lives in
//! [`OrganicResult`](andy_domain::OrganicResult).

use super::ApiEndpoint;
use andy_domain::tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use andy_domain::{OrganicResult, extract_market};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Tool name constant
pub const SERP_ANALYSIS: &str = "serp_analysis";

const DEFAULT_RESULTS: i64 = 10;
const MIN_RESULTS: i64 = 5;
const MAX_RESULTS: i64 = 20;

/// SerpAPI endpoint plus the search location
#[derive(Debug, Clone, PartialEq)]
pub struct SerpEndpoint {
    pub api: ApiEndpoint,
    pub location: String,
}

/// Get the tool definition for serp_analysis
pub fn serp_analysis_definition() -> ToolDefinition {
    ToolDefinition::new(
        SERP_ANALYSIS,
        "Analyze search engine results for a product query to find competitors and related keywords.",
    )
    .with_parameter(
        ToolParameter::new("query", "Search query for the product", true).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new(
            "results_count",
            "Number of search results to analyze (5-20)",
            false,
        )
        .with_type("integer")
        .with_default(DEFAULT_RESULTS),
    )
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    error: Option<String>,
}

/// Execute the serp_analysis tool
pub async fn execute_serp_analysis(
    client: &reqwest::Client,
    endpoint: &SerpEndpoint,
    call: &ToolCall,
) -> ToolResult {
    let query = match call.require_string("query") {
        Ok(q) if !q.trim().is_empty() => q.trim(),
        _ => {
            return ToolResult::failure(
                SERP_ANALYSIS,
                ToolError::validation("Please provide a valid search query."),
            );
        }
    };

    let results_count = call
        .get_i64("results_count")
        .unwrap_or(DEFAULT_RESULTS)
        .clamp(MIN_RESULTS, MAX_RESULTS);

    let api_key = match endpoint.api.require_key() {
        Ok(k) => k,
        Err(e) => return ToolResult::failure(SERP_ANALYSIS, e),
    };

    info!(query, results_count, "Analyzing search results");
    let (results, bytes) = match search(client, endpoint, api_key, query, results_count).await {
        Ok(r) => r,
        Err(e) => {
            warn!(query, error = %e, "Search analysis failed");
            return ToolResult::failure(SERP_ANALYSIS, e);
        }
    };
    debug!(query, results = results.len(), bytes, "Search results received");

    let market = extract_market(query, &results);
    match serde_json::to_value(&market) {
        Ok(value) => ToolResult::success(SERP_ANALYSIS, value).with_bytes(bytes),
        Err(e) => ToolResult::failure(SERP_ANALYSIS, ToolError::execution_failed(e.to_string())),
    }
}

async fn search(
    client: &reqwest::Client,
    endpoint: &SerpEndpoint,
    api_key: &str,
    query: &str,
    results_count: i64,
) -> Result<(Vec<OrganicResult>, usize), ToolError> {
    let num = results_count.to_string();
    let response = client
        .get(endpoint.api.url("/search.json"))
        .query(&[
            ("engine", "google"),
            ("q", query),
            ("num", num.as_str()),
            ("location", endpoint.location.as_str()),
            ("api_key", api_key),
        ])
        .send()
        .await
        .map_err(|e| {
            // The request URL carries api_key
            ToolError::upstream(format!("Failed to reach the search service: {}", e.without_url()))
        })?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| {
            ToolError::upstream(format!("Failed to read search response: {}", e.without_url()))
        })?;

    if !status.is_success() {
        return Err(ToolError::upstream(format!(
            "Search service returned {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    let parsed: SearchResponse = serde_json::from_slice(&body)
        .map_err(|e| ToolError::upstream(format!("Unexpected search response: {}", e)))?;

    if let Some(error) = parsed.error {
        return Err(ToolError::upstream(format!("Search service error: {}", error)));
    }
    if parsed.organic_results.is_empty() {
        return Err(ToolError::upstream(format!(
            "No organic results found for query: {}",
            query
        )));
    }

    Ok((parsed.organic_results, body.len()))
}
