//! Workflow stages

use crate::tool::ToolKind;
use serde::{Deserialize, Serialize};

/// Position of a conversation in the analysis pipeline.
///
/// ```text
/// AwaitingUrl → Scraping → Researching → Categorizing → Summarizing → Done
///      ▲                                                              │
///      └──────────────────────────── reset ───────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    #[default]
    AwaitingUrl,
    Scraping,
    Researching,
    Categorizing,
    Summarizing,
    Done,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::AwaitingUrl => "awaiting_url",
            WorkflowStage::Scraping => "scraping",
            WorkflowStage::Researching => "researching",
            WorkflowStage::Categorizing => "categorizing",
            WorkflowStage::Summarizing => "summarizing",
            WorkflowStage::Done => "done",
        }
    }

    /// Human-readable label for status displays
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStage::AwaitingUrl => "Waiting for a product URL",
            WorkflowStage::Scraping => "Analyzing product page",
            WorkflowStage::Researching => "Researching the market",
            WorkflowStage::Categorizing => "Mapping audience categories",
            WorkflowStage::Summarizing => "Writing recommendations",
            WorkflowStage::Done => "Analysis complete",
        }
    }

    /// The stage that follows on success
    pub fn next(&self) -> Option<WorkflowStage> {
        match self {
            WorkflowStage::AwaitingUrl => Some(WorkflowStage::Scraping),
            WorkflowStage::Scraping => Some(WorkflowStage::Researching),
            WorkflowStage::Researching => Some(WorkflowStage::Categorizing),
            WorkflowStage::Categorizing => Some(WorkflowStage::Summarizing),
            WorkflowStage::Summarizing => Some(WorkflowStage::Done),
            WorkflowStage::Done => None,
        }
    }

    /// The tool this stage runs, if any
    pub fn tool(&self) -> Option<ToolKind> {
        match self {
            WorkflowStage::Scraping => Some(ToolKind::Firecrawler),
            WorkflowStage::Researching => Some(ToolKind::SerpAnalysis),
            WorkflowStage::Categorizing => Some(ToolKind::CategoryTree),
            _ => None,
        }
    }

    /// Whether the pipeline has work left to do in this stage
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, WorkflowStage::AwaitingUrl | WorkflowStage::Done)
    }

    /// Allowed moves: one step forward, or back to the start
    pub fn can_transition_to(&self, to: WorkflowStage) -> bool {
        to == WorkflowStage::AwaitingUrl || self.next() == Some(to)
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let mut stage = WorkflowStage::default();
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(stage.can_transition_to(next));
            stage = next;
            seen.push(stage);
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(stage, WorkflowStage::Done);
    }

    #[test]
    fn test_transitions() {
        assert!(WorkflowStage::Categorizing.can_transition_to(WorkflowStage::AwaitingUrl));
        assert!(!WorkflowStage::Scraping.can_transition_to(WorkflowStage::Categorizing));
        assert!(!WorkflowStage::Done.can_transition_to(WorkflowStage::Scraping));
    }

    #[test]
    fn test_stage_tools() {
        assert_eq!(WorkflowStage::Scraping.tool(), Some(ToolKind::Firecrawler));
        assert_eq!(WorkflowStage::Researching.tool(), Some(ToolKind::SerpAnalysis));
        assert_eq!(WorkflowStage::Categorizing.tool(), Some(ToolKind::CategoryTree));
        assert_eq!(WorkflowStage::Summarizing.tool(), None);
        assert!(WorkflowStage::Summarizing.is_in_progress());
        assert!(!WorkflowStage::Done.is_in_progress());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_value(WorkflowStage::AwaitingUrl).unwrap(),
            "awaiting_url"
        );
    }
}
