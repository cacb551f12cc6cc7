//! Tool domain module
//!
//! This module defines the contract every workflow tool follows: a
//! [`ToolDefinition`] describes the tool and its parameters, a [`ToolCall`]
//! carries the arguments, and execution always yields a [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolKind     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (closed set) │    │ (invocation) │    │ (JSON/error) │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        └─ definition: name, description, ordered parameters
//! ```
//!
//! # Key Types
//!
//! - [`ToolKind`]: `firecrawler`, `serp_analysis`, `category_tree`
//! - [`ToolSpec`]: Ordered collection of tool definitions
//! - [`ToolDefinition`]: Schema for a single tool
//! - [`ToolCall`]: An invocation request with JSON arguments
//! - [`ToolResult`]: Execution outcome, success payload or [`ToolError`]
//! - [`ToolValidator`]: Pure parameter validation against a definition
//!
//! The async executor port lives in the application layer; concrete tools
//! (HTTP calls, taxonomy lookups) live in infrastructure.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolKind, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolErrorKind, ToolResult, ToolResultMetadata};
