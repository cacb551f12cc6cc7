//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section has defaults, so a partial (or missing) file is valid.

mod providers;
mod service;
mod workflow;

pub use providers::{FileFirecrawlConfig, FileOpenAiConfig, FileProvidersConfig, FileSerpApiConfig};
pub use service::{FileLoggingConfig, FileServerConfig, FileTaxonomyConfig};
pub use workflow::FileWorkflowConfig;

use andy_application::WorkflowParams;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// External API credentials and endpoints
    pub providers: FileProvidersConfig,
    /// Pipeline parameters
    pub workflow: FileWorkflowConfig,
    pub taxonomy: FileTaxonomyConfig,
    pub server: FileServerConfig,
    pub logging: FileLoggingConfig,
}

/// A configuration problem that does not stop startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FileConfig {
    /// Workflow parameters with the model sampling settings folded in
    pub fn workflow_params(&self) -> WorkflowParams {
        let openai = &self.providers.openai;
        self.workflow
            .to_params(openai.temperature, openai.max_tokens, openai.reply_max_tokens)
    }

    /// Check for values that will be clamped or ignored.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        let mut issue = |field: &str, message: String| {
            issues.push(ConfigValidationError {
                field: field.to_string(),
                message,
            })
        };

        let workflow = &self.workflow;
        if !(1..=3).contains(&workflow.scrape_depth) {
            issue(
                "workflow.scrape_depth",
                format!("{} is outside 1-3 and will be clamped", workflow.scrape_depth),
            );
        }
        if !(5..=20).contains(&workflow.results_count) {
            issue(
                "workflow.results_count",
                format!("{} is outside 5-20 and will be clamped", workflow.results_count),
            );
        }
        if workflow.history_window == 0 {
            issue("workflow.history_window", "0 is raised to 1".to_string());
        }
        if workflow.request_timeout_secs == 0 {
            issue(
                "workflow.request_timeout_secs",
                "must be greater than 0".to_string(),
            );
        }
        if !(0.0..=2.0).contains(&self.providers.openai.temperature) {
            issue(
                "providers.openai.temperature",
                format!("{} is outside 0.0-2.0", self.providers.openai.temperature),
            );
        }
        if let Some(path) = &self.taxonomy.path
            && !path.exists()
        {
            issue(
                "taxonomy.path",
                format!("{} does not exist", path.display()),
            );
        }

        issues
    }
}
