//! Tool domain value objects: immutable result and error types
//!
//! These types form the **output side** of every tool execution. A tool
//! never propagates a failure: it returns a [`ToolResult`] whose
//! `success` flag tells the caller which of `result` / `error` is present.
//!
//! Error kinds in [`ToolError`] tell the orchestrator what to say to the user:
//!
//! | Kind | Retry by user? | Description |
//! |------|----------------|-------------|
//! | `VALIDATION` | Yes, with corrected input | Bad or missing arguments |
//! | `UPSTREAM` | Yes, as-is | Remote API failed or returned nothing usable |
//! | `CONFIGURATION` | No | Tool unavailable (missing API key) |
//! | `NOT_FOUND` | No | Unknown tool or category |
//! | `EXECUTION` | No | Unexpected local failure |

use serde::{Deserialize, Serialize};

/// Classification of a tool failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorKind {
    Validation,
    Upstream,
    Configuration,
    NotFound,
    Execution,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::Validation => "VALIDATION",
            ToolErrorKind::Upstream => "UPSTREAM",
            ToolErrorKind::Configuration => "CONFIGURATION",
            ToolErrorKind::NotFound => "NOT_FOUND",
            ToolErrorKind::Execution => "EXECUTION",
        }
    }

    /// Whether sending the same request again may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolErrorKind::Upstream)
    }
}

/// Error that occurred during tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error classification
    pub kind: ToolErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Validation, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Upstream, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Configuration, message)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ToolErrorKind::NotFound,
            format!("Not found: {}", resource.into()),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message)
    }

    pub fn code(&self) -> &'static str {
        self.kind.as_str()
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution.
///
/// Exactly one of `result` / `error` is set, matching `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Structured payload (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of bytes received from the upstream API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            result: Some(result),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            result: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    /// Add byte count metadata
    pub fn with_bytes(mut self, bytes: usize) -> Self {
        self.metadata.bytes = Some(bytes);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Deserialize the payload into a typed value
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.result
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Flat `{status, tool_name, result, error}` view used by the HTTP surface
    pub fn to_status_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": if self.success { "success" } else { "error" },
            "tool_name": self.tool_name,
            "result": self.result,
            "error": self.error.as_ref().map(|e| e.message.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_error() {
        let err = ToolError::upstream("Firecrawl returned 502").with_details("bad gateway");

        assert_eq!(err.code(), "UPSTREAM");
        assert!(err.kind.is_retryable());
        assert_eq!(err.to_string(), "[UPSTREAM] Firecrawl returned 502 (bad gateway)");
        assert!(!ToolError::validation("bad url").kind.is_retryable());
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("serp_analysis", json!({"keywords": ["audio"]}))
            .with_duration(12);

        assert!(result.is_success());
        assert!(result.error().is_none());
        assert_eq!(result.result().unwrap()["keywords"][0], "audio");
        assert_eq!(result.metadata.duration_ms, Some(12));
    }

    #[test]
    fn test_tool_result_failure() {
        let result = ToolResult::failure("firecrawler", ToolError::configuration("no key"));

        assert!(!result.is_success());
        assert!(result.result().is_none());
        assert_eq!(result.error().unwrap().kind, ToolErrorKind::Configuration);
    }

    #[test]
    fn test_error_kind_serializes_as_code() {
        let value = serde_json::to_value(ToolError::not_found("Shoes")).unwrap();
        assert_eq!(value["kind"], "NOT_FOUND");
        assert_eq!(value["message"], "Not found: Shoes");
    }

    #[test]
    fn test_status_json() {
        let ok = ToolResult::success("category_tree", json!({"categories": []}));
        assert_eq!(ok.to_status_json()["status"], "success");

        let failed = ToolResult::failure("category_tree", ToolError::validation("empty"));
        let view = failed.to_status_json();
        assert_eq!(view["status"], "error");
        assert_eq!(view["error"], "empty");
        assert!(view["result"].is_null());
    }

    #[test]
    fn test_decode_typed_payload() {
        #[derive(serde::Deserialize)]
        struct Payload {
            count: u32,
        }
        let result = ToolResult::success("serp_analysis", json!({"count": 4}));
        assert_eq!(result.decode::<Payload>().unwrap().count, 4);
        assert!(ToolResult::failure("x", ToolError::upstream("down")).decode::<Payload>().is_none());
    }
}
