//! Prompt domain
//!
//! Fixed replies, stage reports and language model prompts for each stage
//! of the analysis workflow.

mod template;

pub use template::PromptTemplate;
