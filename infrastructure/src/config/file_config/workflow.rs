//! Workflow configuration from TOML (`[workflow]` section)

use andy_application::WorkflowParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkflowConfig {
    /// Messages sent along with a follow-up question
    pub history_window: usize,
    /// Crawl depth passed to the scraper (1-3)
    pub scrape_depth: u8,
    /// Search results requested per query (5-20)
    pub results_count: u8,
    pub max_categories: usize,
    pub max_subcategories: usize,
    /// Timeout for every outbound HTTP request
    pub request_timeout_secs: u64,
}

impl Default for FileWorkflowConfig {
    fn default() -> Self {
        Self {
            history_window: 10,
            scrape_depth: 2,
            results_count: 10,
            max_categories: 3,
            max_subcategories: 5,
            request_timeout_secs: 30,
        }
    }
}

impl FileWorkflowConfig {
    /// Out-of-range values are clamped rather than rejected.
    pub fn to_params(&self, temperature: f32, max_tokens: u32, reply_max_tokens: u32) -> WorkflowParams {
        let mut params = WorkflowParams::default()
            .with_history_window(self.history_window.max(1))
            .with_scrape_depth(self.scrape_depth.clamp(1, 3))
            .with_results_count(self.results_count.clamp(5, 20))
            .with_category_limits(self.max_categories.max(1), self.max_subcategories.max(1));
        params.temperature = temperature;
        params.recommendation_max_tokens = max_tokens;
        params.reply_max_tokens = reply_max_tokens;
        params
    }
}
