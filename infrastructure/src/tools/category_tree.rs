//! `category_tree` tool: map product attributes onto the marketing taxonomy.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `product_description` | string | Yes | Product description |
//! | `product_features` | array | No | Feature strings |
//! | `product_keywords` | array | No | Market keywords |
//! | `max_categories` | integer | No | Default 3 |
//! | `max_subcategories` | integer | No | Default 5 |
//! | `mode` | string | No | `match` (default), `explore_toplevel`, `explore_subcategories` |
//! | `parent_category` | string | No | Parent for `explore_subcategories` |
//!
//! Runs entirely in memory against the shared taxonomy.

use andy_domain::tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use andy_domain::{
    CategoryTaxonomy, MatchInput, MatchLimits, explore_subcategories, explore_top_level,
    match_categories,
};
use serde_json::{Value, json};
use tracing::info;

/// Tool name constant
pub const CATEGORY_TREE: &str = "category_tree";

const MODE_MATCH: &str = "match";
const MODE_EXPLORE_TOPLEVEL: &str = "explore_toplevel";
const MODE_EXPLORE_SUBCATEGORIES: &str = "explore_subcategories";

/// Get the tool definition for category_tree
pub fn category_tree_definition() -> ToolDefinition {
    let limits = MatchLimits::default();
    ToolDefinition::new(
        CATEGORY_TREE,
        "Map a product to marketing audience categories and generate audience segments.",
    )
    .with_parameter(
        ToolParameter::new("product_description", "Description of the product", true)
            .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("product_features", "List of product features", false)
            .with_type("array"),
    )
    .with_parameter(
        ToolParameter::new("product_keywords", "Keywords related to the product", false)
            .with_type("array"),
    )
    .with_parameter(
        ToolParameter::new("max_categories", "Maximum number of categories to return", false)
            .with_type("integer")
            .with_default(limits.max_categories),
    )
    .with_parameter(
        ToolParameter::new(
            "max_subcategories",
            "Maximum number of subcategories per category",
            false,
        )
        .with_type("integer")
        .with_default(limits.max_subcategories),
    )
    .with_parameter(
        ToolParameter::new("mode", "Mode of operation", false)
            .with_type("string")
            .with_default(MODE_MATCH)
            .with_allowed([MODE_MATCH, MODE_EXPLORE_TOPLEVEL, MODE_EXPLORE_SUBCATEGORIES]),
    )
    .with_parameter(
        ToolParameter::new(
            "parent_category",
            "Category whose subcategories to list (explore_subcategories mode)",
            false,
        )
        .with_type("string"),
    )
}

/// Execute the category_tree tool
pub fn execute_category_tree(taxonomy: &CategoryTaxonomy, call: &ToolCall) -> ToolResult {
    match call.get_string("mode").unwrap_or(MODE_MATCH) {
        MODE_EXPLORE_TOPLEVEL => {
            let categories = explore_top_level(taxonomy);
            info!(count = categories.len(), "Listing top-level categories");
            success(json!({
                "mode": MODE_EXPLORE_TOPLEVEL,
                "categories": categories,
                "audience_segments": [],
            }))
        }
        MODE_EXPLORE_SUBCATEGORIES => {
            let Some(parent) = call.get_string("parent_category").filter(|p| !p.trim().is_empty())
            else {
                return ToolResult::failure(
                    CATEGORY_TREE,
                    ToolError::validation(
                        "parent_category is required in explore_subcategories mode",
                    ),
                );
            };
            match explore_subcategories(taxonomy, parent) {
                Ok(subcategories) => {
                    info!(parent, count = subcategories.len(), "Listing subcategories");
                    success(json!({
                        "mode": MODE_EXPLORE_SUBCATEGORIES,
                        "parent_category": parent,
                        "subcategories": subcategories,
                        "audience_segments": [],
                    }))
                }
                Err(e) => ToolResult::failure(CATEGORY_TREE, e.into()),
            }
        }
        _ => {
            let input = MatchInput::new(call.get_string("product_description").unwrap_or_default())
                .with_features(call.get_string_list("product_features"))
                .with_keywords(call.get_string_list("product_keywords"));
            let defaults = MatchLimits::default();
            let limits = MatchLimits {
                max_categories: limit(call, "max_categories", defaults.max_categories),
                max_subcategories: limit(call, "max_subcategories", defaults.max_subcategories),
            };

            let outcome = match_categories(taxonomy, &input, limits);
            info!(
                categories = outcome.categories.len(),
                segments = outcome.audience_segments.len(),
                fallback = outcome.used_fallback,
                "Category mapping completed"
            );

            match serde_json::to_value(&outcome) {
                Ok(Value::Object(mut map)) => {
                    map.insert("mode".to_string(), json!(MODE_MATCH));
                    success(Value::Object(map))
                }
                Ok(other) => success(other),
                Err(e) => {
                    ToolResult::failure(CATEGORY_TREE, ToolError::execution_failed(e.to_string()))
                }
            }
        }
    }
}

fn success(value: Value) -> ToolResult {
    ToolResult::success(CATEGORY_TREE, value)
}

/// Positive integer argument, else `default`
fn limit(call: &ToolCall, key: &str, default: usize) -> usize {
    call.get_i64(key)
        .filter(|n| *n > 0)
        .map(|n| n as usize)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use andy_domain::{CategoryNode, MatchOutcome, ToolErrorKind};

    fn taxonomy() -> CategoryTaxonomy {
        CategoryTaxonomy::new(vec![
            CategoryNode::new("Technology")
                .with_description("Interest in tech products")
                .with_subcategory(
                    CategoryNode::new("Consumer Electronics").with_values(["Headphones", "Speakers"]),
                )
                .with_subcategory(CategoryNode::new("Software")),
            CategoryNode::new("Home").with_subcategory(CategoryNode::new("Furniture")),
        ])
    }

    #[test]
    fn test_match_mode() {
        let call = ToolCall::new(CATEGORY_TREE)
            .with_arg("product_description", "Noise cancelling headphones")
            .with_arg("product_features", vec!["Bluetooth device"])
            .with_arg("product_keywords", vec!["wireless", "consumer electronics"])
            .with_arg("max_categories", 1);

        let result = execute_category_tree(&taxonomy(), &call);

        assert!(result.is_success());
        assert_eq!(result.result().unwrap()["mode"], "match");
        let outcome: MatchOutcome = result.decode().unwrap();
        assert_eq!(outcome.categories.len(), 1);
        assert_eq!(outcome.categories[0].name, "Technology");
        assert_eq!(outcome.categories[0].subcategories[0].name, "Consumer Electronics");
        assert!(!outcome.audience_segments.is_empty());
    }

    #[test]
    fn test_match_is_repeatable() {
        let call = ToolCall::new(CATEGORY_TREE).with_arg("product_description", "home speakers");
        let first = execute_category_tree(&taxonomy(), &call);
        let second = execute_category_tree(&taxonomy(), &call);
        assert_eq!(first.result(), second.result());
    }

    #[test]
    fn test_explore_toplevel() {
        let call = ToolCall::new(CATEGORY_TREE)
            .with_arg("product_description", "-")
            .with_arg("mode", "explore_toplevel");
        let result = execute_category_tree(&taxonomy(), &call);
        let value = result.result().unwrap();
        assert_eq!(value["categories"][0]["name"], "Home");
        assert_eq!(value["categories"][1]["has_subcategories"], true);
        assert_eq!(value["audience_segments"], json!([]));
    }

    #[test]
    fn test_explore_subcategories() {
        let call = ToolCall::new(CATEGORY_TREE)
            .with_arg("product_description", "-")
            .with_arg("mode", "explore_subcategories")
            .with_arg("parent_category", "technology");
        let result = execute_category_tree(&taxonomy(), &call);
        let subs = &result.result().unwrap()["subcategories"];
        assert_eq!(subs[0]["name"], "Consumer Electronics");
        assert_eq!(subs[1]["name"], "Software");
    }

    #[test]
    fn test_explore_unknown_parent_is_validation_error() {
        let call = ToolCall::new(CATEGORY_TREE)
            .with_arg("product_description", "-")
            .with_arg("mode", "explore_subcategories")
            .with_arg("parent_category", "Pets");
        let result = execute_category_tree(&taxonomy(), &call);
        assert_eq!(result.error().unwrap().kind, ToolErrorKind::Validation);

        let call = ToolCall::new(CATEGORY_TREE)
            .with_arg("product_description", "-")
            .with_arg("mode", "explore_subcategories");
        assert!(!execute_category_tree(&taxonomy(), &call).is_success());
    }
}
