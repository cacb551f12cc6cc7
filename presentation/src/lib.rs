//! Presentation layer for audience-andy
//!
//! This crate contains CLI definitions, the interactive chat REPL,
//! the HTTP API, output formatters and the system check report.

pub mod chat;
pub mod check;
pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use check::{CheckItem, CheckReport};
pub use cli::commands::{Cli, Command};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
pub use server::{ApiError, AppState, ServerError, serve};
