//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolError;

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError>;
}

/// Default implementation of ToolValidator
///
/// Checks required parameters, rejects unknown ones, and checks the JSON
/// type of every supplied argument against the parameter's type hint.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError> {
        for param in &definition.parameters {
            let missing = match call.arguments.get(&param.name) {
                None | Some(serde_json::Value::Null) => true,
                Some(serde_json::Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if param.required && missing {
                return Err(ToolError::validation(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                )));
            }
        }

        for (arg_name, value) in &call.arguments {
            let Some(param) = definition.parameter(arg_name) else {
                return Err(ToolError::validation(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                )));
            };

            if value.is_null() {
                continue;
            }

            let type_ok = match param.param_type.as_str() {
                "string" => value.is_string(),
                "integer" => value.is_i64() || value.is_u64(),
                "array" => value.is_array(),
                "boolean" => value.is_boolean(),
                _ => true,
            };
            if !type_ok {
                return Err(ToolError::validation(format!(
                    "Parameter '{}' for tool '{}' must be of type {}",
                    param.name, definition.name, param.param_type
                )));
            }

            if !param.allowed.is_empty()
                && let Some(s) = value.as_str()
                && !param.allowed.iter().any(|a| a == s)
            {
                return Err(ToolError::validation(format!(
                    "Parameter '{}' must be one of: {}",
                    param.name,
                    param.allowed.join(", ")
                )));
            }
        }

        Ok(())
    }
}
