//! Interactive chat module
//!
//! Provides a line-editor chat interface over the analysis workflow.

mod repl;

pub use repl::ChatRepl;
