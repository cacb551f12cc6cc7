//! Per-session conversation state

use super::message::Message;
use super::recommendation::Recommendation;
use super::stage::WorkflowStage;
use crate::market::MarketData;
use crate::product::ProductData;
use crate::taxonomy::MatchOutcome;
use crate::tool::ToolResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything one conversation has accumulated.
///
/// Owned by exactly one session; the orchestrator mutates it through
/// `&mut` so a session processes one message at a time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationState {
    stage: WorkflowStage,
    product_url: Option<String>,
    outputs: BTreeMap<WorkflowStage, ToolResult>,
    history: Vec<Message>,
    recommendation: Option<Recommendation>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    /// Move to `to`, returning false (and staying put) for a disallowed move
    pub fn transition(&mut self, to: WorkflowStage) -> bool {
        if !self.stage.can_transition_to(to) {
            return false;
        }
        self.stage = to;
        true
    }

    /// Back to `AwaitingUrl` with every output, message and recommendation dropped
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drop the previous run's outputs and start over on a new URL
    pub fn begin_analysis(&mut self, url: impl Into<String>) {
        self.stage = WorkflowStage::Scraping;
        self.product_url = Some(url.into());
        self.outputs.clear();
        self.recommendation = None;
    }

    pub fn product_url(&self) -> Option<&str> {
        self.product_url.as_deref()
    }

    pub fn record_output(&mut self, stage: WorkflowStage, result: ToolResult) {
        self.outputs.insert(stage, result);
    }

    pub fn output(&self, stage: WorkflowStage) -> Option<&ToolResult> {
        self.outputs.get(&stage)
    }

    pub fn outputs(&self) -> &BTreeMap<WorkflowStage, ToolResult> {
        &self.outputs
    }

    /// Product data from a successful scrape
    pub fn product(&self) -> Option<ProductData> {
        self.successful_output(WorkflowStage::Scraping)?
            .result()?
            .get("product")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Market data from a successful search analysis
    pub fn market(&self) -> Option<MarketData> {
        self.successful_output(WorkflowStage::Researching)?.decode()
    }

    /// Category matches from a successful taxonomy lookup
    pub fn categories(&self) -> Option<MatchOutcome> {
        self.successful_output(WorkflowStage::Categorizing)?.decode()
    }

    fn successful_output(&self, stage: WorkflowStage) -> Option<&ToolResult> {
        self.outputs.get(&stage).filter(|r| r.is_success())
    }

    pub fn push_message(&mut self, message: Message) {
        self.history.push(message);
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The last `n` messages, oldest first
    pub fn recent_history(&self, n: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    pub fn set_recommendation(&mut self, recommendation: Recommendation) {
        self.recommendation = Some(recommendation);
    }

    /// Whether anything has happened since the last reset
    pub fn is_active(&self) -> bool {
        self.stage != WorkflowStage::AwaitingUrl || !self.history.is_empty()
    }
}
