//! Run Workflow use case.
//!
//! Drives one conversation through the analysis pipeline:
//!
//! ```text
//! AwaitingUrl ──URL──▶ Scraping ──▶ Researching ──▶ Categorizing ──▶ Summarizing ──▶ Done
//!                     firecrawler   serp_analysis    category_tree     language model
//! ```
//!
//! A message carrying a URL runs the stages back to back in the same turn.
//! The first failing stage stops the run; the state stays in that stage and
//! the failure is reported as a chat message, so the next message retries
//! it. Once `Done`, messages are follow-up questions answered by the
//! language model, unless they ask to analyze a new URL.
//!
//! The orchestrator holds no per-conversation data. Callers own a
//! [`ConversationState`] per session and pass it in by `&mut`, which keeps a
//! session to one message at a time.

use crate::config::WorkflowParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use andy_domain::{
    AudienceSegment, CategoryMatch, ConversationState, MarketData, Message, MessageIntent,
    ProductData, PromptTemplate, Recommendation, Strategy, ToolCall, ToolError, ToolResult,
    WorkflowStage, fallback_title,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Placeholder feature when the page listed none
const FALLBACK_FEATURE: &str = "Product available online";
/// Generic keywords added when search analysis found none
const FALLBACK_KEYWORDS: &[&str] = &["online", "quality", "popular"];

/// Why a stage could not complete
#[derive(Error, Debug)]
enum StageError {
    #[error("{}", .0.message)]
    Tool(ToolError),

    #[error("{0}")]
    Gateway(#[from] GatewayError),

    #[error("missing {0} from an earlier step")]
    MissingInput(&'static str),

    #[error("no tool runs during the {0} stage")]
    NoTool(WorkflowStage),
}

/// Reply to one user message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowReply {
    pub message: String,
    pub stage: WorkflowStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Idle,
}

/// Dashboard snapshot of a conversation
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStatus {
    pub status: SessionStatus,
    pub workflow_stage: WorkflowStage,
    pub stage_label: &'static str,
    pub product_url: Option<String>,
    pub product_data: Option<ProductData>,
    pub market_data: Option<MarketData>,
    pub categories: Vec<CategoryMatch>,
    pub audience_segments: Vec<AudienceSegment>,
    pub strategies: Vec<Strategy>,
    /// Failure of the tool run in the current stage, if it failed
    pub last_error: Option<String>,
}

/// Use case for running the analysis workflow.
#[derive(Clone)]
pub struct WorkflowOrchestrator {
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
    params: WorkflowParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl WorkflowOrchestrator {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        params: WorkflowParams,
    ) -> Self {
        Self {
            gateway,
            tools,
            params,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &WorkflowParams {
        &self.params
    }

    pub fn tools(&self) -> &Arc<dyn ToolExecutorPort> {
        &self.tools
    }

    pub fn gateway(&self) -> &Arc<dyn LlmGateway> {
        &self.gateway
    }

    /// Start a fresh conversation and return the greeting.
    pub fn start(&self, state: &mut ConversationState) -> WorkflowReply {
        info!("Starting new conversation");
        state.reset();
        self.conversation_logger
            .log(ConversationEvent::new("conversation_started", json!({})));
        self.reply(state, PromptTemplate::greeting().to_string())
    }

    /// Drop everything and go back to waiting for a URL.
    pub fn reset(&self, state: &mut ConversationState) -> WorkflowReply {
        info!(from = %state.stage(), "Resetting conversation");
        state.reset();
        self.conversation_logger
            .log(ConversationEvent::new("conversation_reset", json!({})));
        self.reply(state, PromptTemplate::reset_done().to_string())
    }

    /// Handle one user message and advance the workflow as far as it goes.
    pub async fn process_message(&self, state: &mut ConversationState, text: &str) -> WorkflowReply {
        let text = text.trim();
        if text.is_empty() {
            return WorkflowReply {
                message: PromptTemplate::empty_message().to_string(),
                stage: state.stage(),
            };
        }

        let stage = state.stage();
        debug!(stage = %stage, chars = text.len(), "Processing user message");
        state.push_message(Message::user(text));
        self.conversation_logger.log(ConversationEvent::new(
            "user_message",
            json!({ "stage": stage, "content": text }),
        ));

        let intent = MessageIntent::parse(text);

        if intent.cancel && stage != WorkflowStage::AwaitingUrl {
            return self.reset(state);
        }

        let message = match stage {
            WorkflowStage::AwaitingUrl => match intent.url {
                Some(url) => self.analyze(state, url).await,
                None => PromptTemplate::url_required().to_string(),
            },
            WorkflowStage::Scraping => match intent.url {
                Some(url) => self.analyze(state, url).await,
                None => PromptTemplate::new_url_required().to_string(),
            },
            WorkflowStage::Researching
            | WorkflowStage::Categorizing
            | WorkflowStage::Summarizing => match intent.url {
                Some(url) if intent.is_new_analysis() => self.analyze(state, url).await,
                _ => self.run_pipeline(state).await,
            },
            WorkflowStage::Done => match intent.url {
                Some(url) if intent.is_new_analysis() => self.analyze(state, url).await,
                _ => self.answer_follow_up(state).await,
            },
        };

        self.reply(state, message)
    }

    /// Dashboard snapshot.
    pub fn status(&self, state: &ConversationState) -> WorkflowStatus {
        let categories = state.categories();
        let stage = state.stage();
        WorkflowStatus {
            status: if state.is_active() {
                SessionStatus::Active
            } else {
                SessionStatus::Idle
            },
            workflow_stage: stage,
            stage_label: stage.label(),
            product_url: state.product_url().map(str::to_string),
            product_data: state.product(),
            market_data: state.market(),
            audience_segments: categories
                .as_ref()
                .map(|c| c.audience_segments.clone())
                .unwrap_or_default(),
            categories: categories.map(|c| c.categories).unwrap_or_default(),
            strategies: state
                .recommendation()
                .map(|r| r.strategies.clone())
                .unwrap_or_default(),
            last_error: state
                .output(stage)
                .and_then(|r| r.error())
                .map(|e| e.message.clone()),
        }
    }

    /// Markdown summary of whatever the conversation has gathered.
    pub fn summary(&self, state: &ConversationState) -> Option<String> {
        let product = state.product()?;
        Some(PromptTemplate::analysis_summary(
            &product,
            state.market().as_ref(),
            state.categories().as_ref(),
            state.recommendation(),
        ))
    }

    fn reply(&self, state: &mut ConversationState, message: String) -> WorkflowReply {
        state.push_message(Message::assistant(message.clone()));
        self.conversation_logger.log(ConversationEvent::new(
            "assistant_message",
            json!({ "stage": state.stage(), "content": message }),
        ));
        WorkflowReply {
            message,
            stage: state.stage(),
        }
    }

    async fn analyze(&self, state: &mut ConversationState, url: String) -> String {
        info!(url = %url, "Starting product analysis");
        let from = state.stage();
        state.begin_analysis(url);
        self.log_transition(from, WorkflowStage::Scraping);
        self.run_pipeline(state).await
    }

    async fn run_pipeline(&self, state: &mut ConversationState) -> String {
        let mut replies = Vec::new();

        while state.stage().is_in_progress() {
            let stage = state.stage();
            info!(stage = %stage, "Running workflow stage");

            match self.run_stage(state, stage).await {
                Ok(report) => {
                    replies.push(report);
                    match stage.next() {
                        Some(next) if state.transition(next) => self.log_transition(stage, next),
                        _ => break,
                    }
                }
                Err(err) => {
                    warn!(stage = %stage, error = %err, "Workflow stage failed");
                    replies.push(match stage {
                        WorkflowStage::Scraping => PromptTemplate::scrape_failed(&err.to_string()),
                        _ => PromptTemplate::stage_failed(stage.label(), &err.to_string()),
                    });
                    break;
                }
            }
        }

        if state.stage() == WorkflowStage::Done {
            if let Some(summary) = self.summary(state) {
                replies.push(summary);
            }
            replies.push(PromptTemplate::analysis_complete().to_string());
        }

        replies.join("\n\n")
    }

    async fn run_stage(
        &self,
        state: &mut ConversationState,
        stage: WorkflowStage,
    ) -> Result<String, StageError> {
        match stage {
            WorkflowStage::Scraping => {
                let url = state
                    .product_url()
                    .ok_or(StageError::MissingInput("product URL"))?
                    .to_string();
                let call = stage_call(stage)?
                    .with_arg("url", url)
                    .with_arg("depth", self.params.scrape_depth);
                self.run_tool(state, stage, call).await?;
                let product = state
                    .product()
                    .ok_or(StageError::MissingInput("product data"))?;
                Ok(PromptTemplate::product_report(&product))
            }
            WorkflowStage::Researching => {
                let product = state
                    .product()
                    .ok_or(StageError::MissingInput("product data"))?;
                let query = product_title(&product);
                let call = stage_call(stage)?
                    .with_arg("query", query)
                    .with_arg("results_count", self.params.results_count);
                self.run_tool(state, stage, call).await?;
                let market = state
                    .market()
                    .ok_or(StageError::MissingInput("market data"))?;
                Ok(PromptTemplate::market_report(&market))
            }
            WorkflowStage::Categorizing => {
                let product = state
                    .product()
                    .ok_or(StageError::MissingInput("product data"))?;
                let market = state.market().unwrap_or_default();
                let title = product_title(&product);

                let description = product.description.clone().unwrap_or_else(|| title.clone());
                let features = if product.features.is_empty() {
                    vec![FALLBACK_FEATURE.to_string()]
                } else {
                    product.features.clone()
                };
                let keywords = if market.keywords.is_empty() {
                    fallback_keywords(&title)
                } else {
                    market.keywords.clone()
                };

                let call = stage_call(stage)?
                    .with_arg("product_description", description)
                    .with_arg("product_features", features)
                    .with_arg("product_keywords", keywords)
                    .with_arg("max_categories", self.params.max_categories)
                    .with_arg("max_subcategories", self.params.max_subcategories);
                self.run_tool(state, stage, call).await?;
                let outcome = state
                    .categories()
                    .ok_or(StageError::MissingInput("category matches"))?;
                Ok(PromptTemplate::category_report(&outcome))
            }
            WorkflowStage::Summarizing => {
                let product = state
                    .product()
                    .ok_or(StageError::MissingInput("product data"))?;
                let market = state.market().unwrap_or_default();
                let categories = state
                    .categories()
                    .ok_or(StageError::MissingInput("category matches"))?;

                self.gateway.check_available()?;
                let messages = [
                    Message::system(PromptTemplate::recommendation_system()),
                    Message::user(PromptTemplate::recommendation_prompt(
                        &product,
                        &market,
                        &categories,
                    )),
                ];
                let text = self
                    .gateway
                    .chat(&messages, &self.params.recommendation_options())
                    .await?;
                if text.trim().is_empty() {
                    return Err(GatewayError::EmptyResponse.into());
                }

                let recommendation = Recommendation::parse(text);
                let count = recommendation.strategies.len();
                self.conversation_logger.log(ConversationEvent::new(
                    "recommendation",
                    json!({ "model": self.gateway.model(), "strategies": count }),
                ));
                state.set_recommendation(recommendation);
                Ok(PromptTemplate::recommendation_ready(count))
            }
            WorkflowStage::AwaitingUrl | WorkflowStage::Done => Ok(String::new()),
        }
    }

    /// Execute a tool call and record its result under `stage`.
    async fn run_tool(
        &self,
        state: &mut ConversationState,
        stage: WorkflowStage,
        call: ToolCall,
    ) -> Result<(), StageError> {
        info!(tool = %call.tool_name, "Executing tool");
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call",
            json!({ "tool": call.tool_name, "arguments": call.arguments }),
        ));

        let result: ToolResult = self.tools.execute(&call).await;

        self.conversation_logger.log(ConversationEvent::new(
            "tool_result",
            json!({
                "tool": result.tool_name,
                "success": result.success,
                "error": result.error().map(|e| e.to_string()),
                "duration_ms": result.metadata.duration_ms,
            }),
        ));

        let error = result.error().cloned();
        state.record_output(stage, result);
        match error {
            None => Ok(()),
            Some(err) => Err(StageError::Tool(err)),
        }
    }

    async fn answer_follow_up(&self, state: &ConversationState) -> String {
        let summary = self
            .summary(state)
            .unwrap_or_else(|| "No analysis data is available.".to_string());
        let mut messages = vec![Message::system(PromptTemplate::follow_up_system(&summary))];
        messages.extend(
            state
                .recent_history(self.params.history_window)
                .iter()
                .cloned(),
        );

        match self
            .gateway
            .chat(&messages, &self.params.reply_options())
            .await
        {
            Ok(answer) if !answer.trim().is_empty() => answer.trim().to_string(),
            Ok(_) => PromptTemplate::model_error(&GatewayError::EmptyResponse.to_string()),
            Err(e) => {
                warn!(error = %e, "Follow-up answer failed");
                PromptTemplate::model_error(&e.to_string())
            }
        }
    }

    fn log_transition(&self, from: WorkflowStage, to: WorkflowStage) {
        info!(from = %from, to = %to, "Workflow stage transition");
        self.conversation_logger.log(ConversationEvent::new(
            "stage_transition",
            json!({ "from": from, "to": to }),
        ));
    }
}

/// Empty call for the tool `stage` runs.
fn stage_call(stage: WorkflowStage) -> Result<ToolCall, StageError> {
    stage
        .tool()
        .map(ToolCall::for_kind)
        .ok_or(StageError::NoTool(stage))
}

fn product_title(product: &ProductData) -> String {
    product
        .title
        .clone()
        .unwrap_or_else(|| fallback_title(&product.url))
}

fn fallback_keywords(title: &str) -> Vec<String> {
    title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() > 3)
        .chain(FALLBACK_KEYWORDS.iter().map(|k| k.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::ChatOptions;
    use crate::ports::tool_executor::ToolAvailability;
    use andy_domain::{
        CategoryNode, CategoryTaxonomy, Competitor, MatchInput, MatchLimits, Role, ToolKind,
        ToolSpec, match_categories,
    };
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockGateway {
        responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        requests: Mutex<Vec<Vec<Message>>>,
    }

    impl MockGateway {
        fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        fn model(&self) -> &str {
            "mock-model"
        }

        async fn chat(
            &self,
            messages: &[Message],
            _options: &ChatOptions,
        ) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::RequestFailed("no more responses".into())))
        }
    }

    struct MockTools {
        spec: ToolSpec,
        results: Mutex<HashMap<ToolKind, ToolResult>>,
        calls: Mutex<Vec<ToolCall>>,
    }

    impl MockTools {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new(),
                results: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn happy() -> Self {
            let tools = Self::new();
            tools.set(ToolKind::Firecrawler, product_result());
            tools.set(ToolKind::SerpAnalysis, market_result());
            tools.set(ToolKind::CategoryTree, category_result());
            tools
        }

        fn set(&self, kind: ToolKind, result: ToolResult) {
            self.results.lock().unwrap().insert(kind, result);
        }

        fn calls(&self) -> Vec<ToolCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolExecutorPort for MockTools {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        fn availability(&self) -> Vec<ToolAvailability> {
            ToolKind::ALL.into_iter().map(ToolAvailability::ready).collect()
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            self.calls.lock().unwrap().push(call.clone());
            let kind = ToolKind::from_name(&call.tool_name).unwrap();
            self.results
                .lock()
                .unwrap()
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| {
                    ToolResult::failure(&call.tool_name, ToolError::upstream("no mock result"))
                })
        }
    }

    fn product_result() -> ToolResult {
        let product = ProductData {
            url: "https://acme.io/p/trail-runner".to_string(),
            title: Some("Acme Trail Runner".to_string()),
            price: Some("$89.00".to_string()),
            description: Some("Lightweight shoes for running on trails".to_string()),
            features: vec!["Grippy sole".to_string()],
            ..Default::default()
        };
        ToolResult::success(
            "firecrawler",
            json!({ "product": product, "warnings": [] }),
        )
    }

    fn market_result() -> ToolResult {
        let market = MarketData {
            query: "Acme Trail Runner".to_string(),
            competitors: vec![Competitor {
                name: "Salomon".to_string(),
                domain: "salomon.com".to_string(),
                occurrences: 2,
                title: "Salomon trail shoes".to_string(),
            }],
            keywords: vec!["hiking".to_string(), "outdoor".to_string()],
            result_count: 10,
        };
        ToolResult::success("serp_analysis", serde_json::to_value(market).unwrap())
    }

    fn category_result() -> ToolResult {
        let taxonomy = CategoryTaxonomy::new(vec![CategoryNode::new("Interests").with_subcategory(
            CategoryNode::new("Fitness and Wellness").with_values(["Running"]),
        )]);
        let outcome = match_categories(
            &taxonomy,
            &MatchInput::new("running interests"),
            MatchLimits::default(),
        );
        ToolResult::success("category_tree", serde_json::to_value(outcome).unwrap())
    }

    fn orchestrator(gateway: Arc<MockGateway>, tools: Arc<MockTools>) -> WorkflowOrchestrator {
        WorkflowOrchestrator::new(gateway, tools, WorkflowParams::default())
    }

    const URL: &str = "https://acme.io/p/trail-runner";

    // ==================== Tests ====================

    #[test]
    fn test_start_greets_and_waits_for_url() {
        let orch = orchestrator(
            Arc::new(MockGateway::new(vec![])),
            Arc::new(MockTools::new()),
        );
        let mut state = ConversationState::new();
        let reply = orch.start(&mut state);
        assert!(reply.message.contains("Audience Andy"));
        assert_eq!(reply.stage, WorkflowStage::AwaitingUrl);
        assert_eq!(state.history().len(), 1);
    }

    #[tokio::test]
    async fn test_message_without_url_keeps_stage() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let tools = Arc::new(MockTools::new());
        let orch = orchestrator(gateway.clone(), tools.clone());
        let mut state = ConversationState::new();

        let reply = orch.process_message(&mut state, "hello there").await;

        assert_eq!(reply.stage, WorkflowStage::AwaitingUrl);
        assert_eq!(reply.message, PromptTemplate::url_required());
        assert!(tools.calls().is_empty());
        assert_eq!(gateway.request_count(), 0);
    }

    #[tokio::test]
    async fn test_scheme_words_do_not_start_analysis() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let tools = Arc::new(MockTools::happy());
        let orch = orchestrator(gateway.clone(), tools.clone());
        let mut state = ConversationState::new();

        for text in ["Does your site support https?", "my httpserver product"] {
            let reply = orch.process_message(&mut state, text).await;
            assert_eq!(reply.stage, WorkflowStage::AwaitingUrl, "message: {text:?}");
            assert_eq!(reply.message, PromptTemplate::url_required());
        }
        assert!(tools.calls().is_empty());
        assert!(state.product_url().is_none());
        assert_eq!(gateway.request_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_message_is_not_recorded() {
        let orch = orchestrator(
            Arc::new(MockGateway::new(vec![])),
            Arc::new(MockTools::new()),
        );
        let mut state = ConversationState::new();
        let reply = orch.process_message(&mut state, "   ").await;
        assert_eq!(reply.message, PromptTemplate::empty_message());
        assert!(state.history().is_empty());
    }

    #[tokio::test]
    async fn test_url_advances_past_scraping() {
        let tools = Arc::new(MockTools::new());
        tools.set(ToolKind::Firecrawler, product_result());
        tools.set(
            ToolKind::SerpAnalysis,
            ToolResult::failure("serp_analysis", ToolError::upstream("search API returned 503")),
        );
        let orch = orchestrator(Arc::new(MockGateway::new(vec![])), tools.clone());
        let mut state = ConversationState::new();

        let reply = orch
            .process_message(&mut state, &format!("please analyze {URL}"))
            .await;

        assert_eq!(reply.stage, WorkflowStage::Researching);
        assert!(reply.message.contains("Acme Trail Runner"));
        assert!(reply.message.contains("search API returned 503"));
        assert!(state.product().is_some());
        assert!(!state.output(WorkflowStage::Researching).unwrap().is_success());

        let status = orch.status(&state);
        assert_eq!(status.last_error.as_deref(), Some("search API returned 503"));
        assert_eq!(status.status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_full_run_reaches_done() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(
            "Strategy one: social\n\nStrategy two: email".to_string(),
        )]));
        let tools = Arc::new(MockTools::happy());
        let orch = orchestrator(gateway.clone(), tools.clone());
        let mut state = ConversationState::new();

        let reply = orch.process_message(&mut state, URL).await;

        assert_eq!(reply.stage, WorkflowStage::Done);
        assert!(reply.message.contains("# Complete Analysis for Acme Trail Runner"));
        assert!(reply.message.contains("### Strategy 2\nStrategy two: email"));

        let calls = tools.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].get_string("url"), Some(URL));
        assert_eq!(calls[0].get_i64("depth"), Some(2));
        assert_eq!(calls[1].get_string("query"), Some("Acme Trail Runner"));
        assert_eq!(calls[1].get_i64("results_count"), Some(10));
        assert_eq!(
            calls[2].get_string("product_description"),
            Some("Lightweight shoes for running on trails")
        );
        assert_eq!(
            calls[2].get_string_list("product_keywords"),
            vec!["hiking", "outdoor"]
        );

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0][0].role, Role::System);
        assert!(requests[0][1].content.contains("Salomon"));
        drop(requests);

        let status = orch.status(&state);
        assert_eq!(status.strategies.len(), 2);
        assert_eq!(status.categories[0].name, "Interests");
        assert!(!status.audience_segments.is_empty());
        assert_eq!(status.market_data.unwrap().competitors[0].name, "Salomon");
        assert!(status.last_error.is_none());
    }

    #[tokio::test]
    async fn test_scrape_failure_waits_for_new_url() {
        let tools = Arc::new(MockTools::new());
        tools.set(
            ToolKind::Firecrawler,
            ToolResult::failure(
                "firecrawler",
                ToolError::validation("The URL appears to be a fictional or example domain."),
            ),
        );
        let orch = orchestrator(Arc::new(MockGateway::new(vec![])), tools.clone());
        let mut state = ConversationState::new();

        let reply = orch
            .process_message(&mut state, "https://example.com/p")
            .await;
        assert_eq!(reply.stage, WorkflowStage::Scraping);
        assert!(reply.message.contains("fictional or example domain"));

        let reply = orch.process_message(&mut state, "what now?").await;
        assert_eq!(reply.stage, WorkflowStage::Scraping);
        assert_eq!(reply.message, PromptTemplate::new_url_required());
        assert_eq!(tools.calls().len(), 1);

        tools.set(ToolKind::Firecrawler, product_result());
        let reply = orch.process_message(&mut state, URL).await;
        assert_eq!(reply.stage, WorkflowStage::Researching);
        assert_eq!(state.product_url(), Some(URL));
    }

    #[tokio::test]
    async fn test_failed_stage_retries_on_next_message() {
        let tools = Arc::new(MockTools::happy());
        tools.set(
            ToolKind::SerpAnalysis,
            ToolResult::failure("serp_analysis", ToolError::upstream("timeout")),
        );
        let gateway = Arc::new(MockGateway::new(vec![Ok("Only strategy".to_string())]));
        let orch = orchestrator(gateway, tools.clone());
        let mut state = ConversationState::new();

        orch.process_message(&mut state, URL).await;
        assert_eq!(state.stage(), WorkflowStage::Researching);

        tools.set(ToolKind::SerpAnalysis, market_result());
        let reply = orch.process_message(&mut state, "try again").await;

        assert_eq!(reply.stage, WorkflowStage::Done);
        // scrape is not repeated on retry
        let names: Vec<_> = tools.calls().iter().map(|c| c.tool_name.clone()).collect();
        assert_eq!(
            names,
            vec!["firecrawler", "serp_analysis", "serp_analysis", "category_tree"]
        );
    }

    #[tokio::test]
    async fn test_unconfigured_model_stops_at_summarizing() {
        let gateway = Arc::new(MockGateway::new(vec![Err(GatewayError::NotConfigured(
            "OPENAI_API_KEY not set".to_string(),
        ))]));
        let orch = orchestrator(gateway, Arc::new(MockTools::happy()));
        let mut state = ConversationState::new();

        let reply = orch.process_message(&mut state, URL).await;

        assert_eq!(reply.stage, WorkflowStage::Summarizing);
        assert!(reply.message.contains("OPENAI_API_KEY not set"));
        assert!(state.recommendation().is_none());
    }

    #[tokio::test]
    async fn test_follow_up_uses_history_window() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok("Strategy A".to_string()),
            Ok("Try short-form video.".to_string()),
        ]));
        let orch = WorkflowOrchestrator::new(
            gateway.clone(),
            Arc::new(MockTools::happy()),
            WorkflowParams::default().with_history_window(2),
        );
        let mut state = ConversationState::new();
        orch.process_message(&mut state, URL).await;

        let reply = orch
            .process_message(&mut state, "Which channel should I start with?")
            .await;

        assert_eq!(reply.stage, WorkflowStage::Done);
        assert_eq!(reply.message, "Try short-form video.");

        let requests = gateway.requests.lock().unwrap();
        let follow_up = &requests[1];
        assert_eq!(follow_up.len(), 3);
        assert!(follow_up[0].content.contains("Complete Analysis for Acme Trail Runner"));
        assert_eq!(follow_up[2].content, "Which channel should I start with?");
    }

    #[tokio::test]
    async fn test_follow_up_error_is_reported() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok("Strategy A".to_string()),
            Err(GatewayError::Timeout),
        ]));
        let orch = orchestrator(gateway, Arc::new(MockTools::happy()));
        let mut state = ConversationState::new();
        orch.process_message(&mut state, URL).await;

        let reply = orch.process_message(&mut state, "More detail?").await;
        assert_eq!(reply.stage, WorkflowStage::Done);
        assert!(reply.message.contains("Timeout"));
    }

    #[tokio::test]
    async fn test_done_restarts_on_analyze_with_url() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok("Strategy A".to_string()),
            Ok("Strategy B".to_string()),
        ]));
        let tools = Arc::new(MockTools::happy());
        let orch = orchestrator(gateway, tools.clone());
        let mut state = ConversationState::new();
        orch.process_message(&mut state, URL).await;

        let reply = orch
            .process_message(&mut state, "analyze https://acme.io/p/road-runner")
            .await;

        assert_eq!(reply.stage, WorkflowStage::Done);
        assert_eq!(tools.calls().len(), 6);
        assert_eq!(state.product_url(), Some("https://acme.io/p/road-runner"));
        assert_eq!(state.recommendation().unwrap().text, "Strategy B");
    }

    #[tokio::test]
    async fn test_cancel_resets_mid_run() {
        let tools = Arc::new(MockTools::happy());
        tools.set(
            ToolKind::CategoryTree,
            ToolResult::failure("category_tree", ToolError::configuration("no taxonomy")),
        );
        let orch = orchestrator(Arc::new(MockGateway::new(vec![])), tools);
        let mut state = ConversationState::new();
        orch.process_message(&mut state, URL).await;
        assert_eq!(state.stage(), WorkflowStage::Categorizing);

        let reply = orch.process_message(&mut state, "cancel").await;

        assert_eq!(reply.stage, WorkflowStage::AwaitingUrl);
        assert_eq!(reply.message, PromptTemplate::reset_done());
        assert!(state.outputs().is_empty());
        assert_eq!(orch.status(&state).status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_reset_clears_outputs() {
        let gateway = Arc::new(MockGateway::new(vec![Ok("Strategy".to_string())]));
        let orch = orchestrator(gateway, Arc::new(MockTools::happy()));
        let mut state = ConversationState::new();
        orch.process_message(&mut state, URL).await;
        assert_eq!(state.stage(), WorkflowStage::Done);

        let reply = orch.reset(&mut state);

        assert_eq!(reply.stage, WorkflowStage::AwaitingUrl);
        assert!(state.outputs().is_empty());
        assert!(state.recommendation().is_none());
        let status = orch.status(&state);
        assert!(status.product_data.is_none());
        assert!(status.strategies.is_empty());
    }

    #[test]
    fn test_stage_call_follows_stage_tool() {
        assert_eq!(
            stage_call(WorkflowStage::Scraping).unwrap().tool_name,
            "firecrawler"
        );
        assert_eq!(
            stage_call(WorkflowStage::Categorizing).unwrap().tool_name,
            "category_tree"
        );
        assert!(matches!(
            stage_call(WorkflowStage::Summarizing),
            Err(StageError::NoTool(WorkflowStage::Summarizing))
        ));
    }

    #[test]
    fn test_fallback_keywords() {
        assert_eq!(
            fallback_keywords("Acme Trail Runner X"),
            vec!["acme", "trail", "runner", "online", "quality", "popular"]
        );
    }
}
