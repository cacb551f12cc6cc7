//! Infrastructure layer for audience-andy
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the analysis tools over Firecrawl, SerpAPI
//! and the local taxonomy, the OpenAI gateway, the JSONL transcript and
//! configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod taxonomy;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileFirecrawlConfig, FileLoggingConfig,
    FileOpenAiConfig, FileProvidersConfig, FileSerpApiConfig, FileServerConfig,
    FileTaxonomyConfig, FileWorkflowConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::OpenAiGateway;
pub use taxonomy::{TaxonomyError, TaxonomyLoader};
pub use tools::serp::SerpEndpoint;
pub use tools::{
    AnalysisToolExecutor, ApiEndpoint, JsonSchemaToolConverter, ToolSettings, default_tool_spec,
};
