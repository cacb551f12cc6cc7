//! OpenAI function-calling schema converter.
//!
//! Default implementation of [`ToolSchemaPort`], producing
//! `{"type": "function", "function": {name, description, parameters}}`.

use andy_application::ports::tool_schema::ToolSchemaPort;
use andy_domain::tool::{ToolDefinition, ToolParameter};
use serde_json::{Map, Value, json};

/// Converts tool definitions to OpenAI function schemas.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"` → `"string"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - `"array"` → `"array"` of strings
/// - anything else → `"string"`
pub struct JsonSchemaToolConverter;

impl JsonSchemaToolConverter {
    fn property(param: &ToolParameter) -> Value {
        let mut prop = Map::new();
        let schema_type = match param.param_type.as_str() {
            "integer" => "integer",
            "boolean" => "boolean",
            "array" => "array",
            _ => "string",
        };
        prop.insert("type".to_string(), json!(schema_type));
        prop.insert("description".to_string(), json!(param.description));
        if schema_type == "array" {
            prop.insert("items".to_string(), json!({"type": "string"}));
        }
        if let Some(default) = &param.default {
            prop.insert("default".to_string(), default.clone());
        }
        if !param.allowed.is_empty() {
            prop.insert("enum".to_string(), json!(param.allowed));
        }
        Value::Object(prop)
    }
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let properties: Map<String, Value> = tool
            .parameters
            .iter()
            .map(|p| (p.name.clone(), Self::property(p)))
            .collect();

        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": tool.required_parameters(),
                }
            }
        })
    }
}
