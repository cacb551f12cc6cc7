//! Progress reporting while a workflow turn runs

use andy_domain::WorkflowStage;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the orchestrator works on a message.
///
/// A turn may run several stages back to back, so the message names what
/// the turn started from rather than tracking each stage.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Start a spinner, or a no-op reporter when `enabled` is false
    pub fn start(stage: WorkflowStage, enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_message(Self::message_for(stage));
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn message_for(stage: WorkflowStage) -> String {
        let text = match stage {
            WorkflowStage::AwaitingUrl | WorkflowStage::Scraping => "Analyzing product page...",
            WorkflowStage::Researching => "Researching the market...",
            WorkflowStage::Categorizing => "Matching audience categories...",
            WorkflowStage::Summarizing => "Writing recommendations...",
            WorkflowStage::Done => "Thinking...",
        };
        text.cyan().to_string()
    }

    /// Clear the spinner from the terminal
    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_reporter_is_silent() {
        let reporter = ProgressReporter::start(WorkflowStage::Done, false);
        assert!(reporter.bar.is_none());
        reporter.finish();
    }

    #[test]
    fn test_message_per_stage() {
        colored::control::set_override(false);
        assert_eq!(
            ProgressReporter::message_for(WorkflowStage::Researching),
            "Researching the market..."
        );
        assert_eq!(
            ProgressReporter::message_for(WorkflowStage::Done),
            "Thinking..."
        );
    }
}
