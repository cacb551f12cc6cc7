//! Application-level configuration.
//!
//! - [`WorkflowParams`]: tool arguments, history window and model sampling

pub mod workflow_params;

pub use workflow_params::WorkflowParams;
