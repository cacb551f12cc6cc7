//! Domain layer for audience-andy
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! Three tools feed the analysis: a product page scraper, a search results
//! analyzer and a taxonomy matcher. Each is described by a
//! [`ToolDefinition`] and always answers with a [`ToolResult`].
//!
//! ## Workflow
//!
//! A conversation walks through [`WorkflowStage`]s, from waiting for a URL
//! to a finished recommendation, accumulating tool outputs in its
//! [`ConversationState`].

pub mod core;
pub mod market;
pub mod product;
pub mod prompt;
pub mod taxonomy;
pub mod tool;
pub mod workflow;

// Re-export commonly used types
pub use core::error::DomainError;
pub use market::{Competitor, MarketData, OrganicResult, extract_market};
pub use product::{
    Extraction, ParsingWarning, ProductData, ScrapedPage, extract_product, extract_url,
    fallback_title, validate_product_url,
};
pub use prompt::PromptTemplate;
pub use taxonomy::{
    AudienceSegment, CategoryMatch, CategoryNode, CategorySummary, CategoryTaxonomy, MatchInput,
    MatchLimits, MatchOutcome, explore_subcategories, explore_top_level, match_categories,
};
pub use tool::{
    DefaultToolValidator, ToolCall, ToolDefinition, ToolError, ToolErrorKind, ToolKind,
    ToolParameter, ToolResult, ToolResultMetadata, ToolSpec, ToolValidator,
};
pub use workflow::{
    ConversationState, Message, MessageIntent, Recommendation, Role, Strategy, WorkflowStage,
};
