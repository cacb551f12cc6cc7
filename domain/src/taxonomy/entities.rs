//! Marketing taxonomy tree

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A node of the taxonomy: a top-level category or any subcategory below it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Leaf values that can be targeted (e.g. "Smartphones")
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub subcategories: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            values: Vec::new(),
            subcategories: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subcategory(mut self, node: CategoryNode) -> Self {
        self.subcategories.push(node);
        self
    }

    pub fn has_subcategories(&self) -> bool {
        !self.subcategories.is_empty()
    }

    /// Depth-first search for a node by name, case-insensitive
    pub fn find(&self, name: &str) -> Option<&CategoryNode> {
        if self.name.eq_ignore_ascii_case(name) {
            return Some(self);
        }
        self.subcategories.iter().find_map(|sub| sub.find(name))
    }

    fn validate(&self, path: &str) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidTaxonomy(format!(
                "unnamed category under '{}'",
                path
            )));
        }
        let here = if path.is_empty() {
            self.name.clone()
        } else {
            format!("{} > {}", path, self.name)
        };
        self.subcategories.iter().try_for_each(|sub| sub.validate(&here))
    }
}

/// The whole taxonomy.
///
/// Loaded once and shared read-only; matching never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTaxonomy {
    pub categories: Vec<CategoryNode>,
}

impl CategoryTaxonomy {
    pub fn new(categories: Vec<CategoryNode>) -> Self {
        Self { categories }
    }

    /// Parse and validate the `{"categories": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let taxonomy: CategoryTaxonomy = serde_json::from_str(json)
            .map_err(|e| DomainError::InvalidTaxonomy(e.to_string()))?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.categories.is_empty() {
            return Err(DomainError::InvalidTaxonomy(
                "taxonomy has no categories".to_string(),
            ));
        }
        self.categories.iter().try_for_each(|c| c.validate(""))
    }

    /// Find a category or subcategory anywhere in the tree
    pub fn find(&self, name: &str) -> Option<&CategoryNode> {
        self.categories.iter().find_map(|c| c.find(name.trim()))
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        fn count(node: &CategoryNode) -> usize {
            1 + node.subcategories.iter().map(count).sum::<usize>()
        }
        self.categories.iter().map(count).sum()
    }
}
