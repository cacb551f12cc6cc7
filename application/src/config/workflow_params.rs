//! Workflow parameters: knobs for the analysis pipeline.
//!
//! [`WorkflowParams`] groups the static parameters the
//! [`WorkflowOrchestrator`](crate::use_cases::run_workflow::WorkflowOrchestrator)
//! passes to tools and to the language model. These are application-layer
//! concerns, not domain policy.

use crate::ports::llm_gateway::ChatOptions;
use serde::{Deserialize, Serialize};

/// Pipeline control parameters.
///
/// | Field | Used by |
/// |-------|---------|
/// | `scrape_depth` | firecrawler call |
/// | `results_count` | serp_analysis call |
/// | `max_categories`, `max_subcategories` | category_tree call |
/// | `history_window` | follow-up questions |
/// | `temperature`, `*_max_tokens` | language model calls |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowParams {
    /// Crawl depth passed to the scraper (1-3).
    pub scrape_depth: u8,
    /// Number of search results to analyze (5-20).
    pub results_count: u8,
    pub max_categories: usize,
    pub max_subcategories: usize,
    /// Messages of history sent with follow-up questions.
    pub history_window: usize,
    pub temperature: f32,
    /// Token budget for the recommendation.
    pub recommendation_max_tokens: u32,
    /// Token budget for follow-up answers.
    pub reply_max_tokens: u32,
}

impl Default for WorkflowParams {
    fn default() -> Self {
        Self {
            scrape_depth: 2,
            results_count: 10,
            max_categories: 3,
            max_subcategories: 5,
            history_window: 10,
            temperature: 0.7,
            recommendation_max_tokens: 1500,
            reply_max_tokens: 1000,
        }
    }
}

impl WorkflowParams {
    // ==================== Builder Methods ====================

    pub fn with_scrape_depth(mut self, depth: u8) -> Self {
        self.scrape_depth = depth;
        self
    }

    pub fn with_results_count(mut self, count: u8) -> Self {
        self.results_count = count;
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_category_limits(mut self, max_categories: usize, max_subcategories: usize) -> Self {
        self.max_categories = max_categories;
        self.max_subcategories = max_subcategories;
        self
    }

    pub fn recommendation_options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
            max_tokens: self.recommendation_max_tokens,
        }
    }

    pub fn reply_options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
            max_tokens: self.reply_max_tokens,
        }
    }
}
