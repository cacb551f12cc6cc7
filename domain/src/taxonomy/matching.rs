//! Keyword scoring of product attributes against the taxonomy.
//!
//! Scores are additive:
//!
//! | Node | Signal | Points |
//! |------|--------|--------|
//! | category | full name in text | 10 |
//! | category | each name word longer than 3 chars | 3 |
//! | category | description in text | 5 |
//! | category | each related keyword | 2 |
//! | category | nothing else, but a general/product/consumer category | 1 |
//! | subcategory | name in text | 5 |
//! | subcategory | description in text | 3 |
//! | subcategory | each value in text | 2 |
//!
//! Terms match whole words (case-insensitive), with an optional plural
//! `s`/`es`. Results are sorted by score, ties broken by name, so the same
//! input always yields the same output.

use super::entities::{CategoryNode, CategoryTaxonomy};
use super::segments::{AudienceSegment, generate_segments};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CATEGORIES: usize = 3;
pub const DEFAULT_MAX_SUBCATEGORIES: usize = 5;
const EMPTY_INPUT_SCORE: u32 = 5;
const GENERAL_MARKERS: &[&str] = &["general", "product", "consumer"];

/// Related words per top-level category name
const KEYWORD_MAP: &[(&str, &[&str])] = &[
    ("Demographics", &["age", "gender", "education", "marital status", "ethnicity"]),
    ("Financial", &["money", "income", "wealth", "finance", "investment", "budget"]),
    ("Home", &["house", "apartment", "residence", "property", "rent", "mortgage"]),
    (
        "Life Events",
        &["wedding", "marriage", "engagement", "birthday", "anniversary", "graduation"],
    ),
    ("Interests", &["hobby", "passion", "activity", "entertainment", "leisure"]),
    ("Shopping and Fashion", &["clothes", "style", "trend", "retail", "purchase", "buy"]),
    ("Technology", &["tech", "gadget", "device", "digital", "electronic", "computer"]),
    ("Behaviors", &["habit", "pattern", "routine", "lifestyle", "behavior"]),
];

/// Free-text product attributes to match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchInput {
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl MatchInput {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Everything joined and lowercased
    pub fn text(&self) -> String {
        std::iter::once(self.description.as_str())
            .chain(self.features.iter().map(String::as_str))
            .chain(self.keywords.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }
}

/// Result count limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    pub max_categories: usize,
    pub max_subcategories: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            max_categories: DEFAULT_MAX_CATEGORIES,
            max_subcategories: DEFAULT_MAX_SUBCATEGORIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryMatch {
    pub name: String,
    pub description: String,
    pub score: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<SubcategoryMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub name: String,
    pub description: String,
    pub score: u32,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryMatch>,
}

/// Output of [`match_categories`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub categories: Vec<CategoryMatch>,
    /// `"Category > Subcategory > value"` for every match
    pub matched_paths: Vec<String>,
    pub audience_segments: Vec<AudienceSegment>,
    /// True when nothing matched and a default category was returned
    pub used_fallback: bool,
}

/// Summary row for the explore modes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    pub description: String,
    pub has_subcategories: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Score the taxonomy against the input and keep the best matches.
pub fn match_categories(
    taxonomy: &CategoryTaxonomy,
    input: &MatchInput,
    limits: MatchLimits,
) -> MatchOutcome {
    let mut used_fallback = false;

    let categories = if input.is_empty() {
        let mut all: Vec<CategoryMatch> = taxonomy
            .categories
            .iter()
            .map(|c| CategoryMatch {
                name: c.name.clone(),
                description: c.description.clone(),
                score: EMPTY_INPUT_SCORE,
                subcategories: Vec::new(),
            })
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all.truncate(limits.max_categories);
        all
    } else {
        let text = input.text();
        let mut scored: Vec<CategoryMatch> = taxonomy
            .categories
            .iter()
            .filter_map(|category| {
                let score = category_score(category, &text);
                (score > 0).then(|| CategoryMatch {
                    name: category.name.clone(),
                    description: category.description.clone(),
                    score,
                    subcategories: match_subcategories(
                        &category.subcategories,
                        &text,
                        limits.max_subcategories,
                    ),
                })
            })
            .collect();

        if scored.is_empty() {
            used_fallback = true;
            scored.push(fallback_category(taxonomy, &text, limits.max_subcategories));
        }

        scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        scored.truncate(limits.max_categories);
        scored
    };

    let matched_paths = categories.iter().flat_map(category_paths).collect();
    let audience_segments = generate_segments(&categories);

    MatchOutcome {
        categories,
        matched_paths,
        audience_segments,
        used_fallback,
    }
}

/// Top-level categories, alphabetical
pub fn explore_top_level(taxonomy: &CategoryTaxonomy) -> Vec<CategorySummary> {
    summarize(&taxonomy.categories)
}

/// Direct children of `parent` (found anywhere in the tree), alphabetical
pub fn explore_subcategories(
    taxonomy: &CategoryTaxonomy,
    parent: &str,
) -> Result<Vec<CategorySummary>, DomainError> {
    taxonomy
        .find(parent)
        .map(|node| summarize(&node.subcategories))
        .ok_or_else(|| DomainError::UnknownCategory(parent.trim().to_string()))
}

fn summarize(nodes: &[CategoryNode]) -> Vec<CategorySummary> {
    let mut out: Vec<CategorySummary> = nodes
        .iter()
        .map(|n| CategorySummary {
            name: n.name.clone(),
            description: n.description.clone(),
            has_subcategories: n.has_subcategories(),
            values: n.values.clone(),
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

fn category_score(category: &CategoryNode, text: &str) -> u32 {
    let name = category.name.to_lowercase();
    let mut score = 0;

    if contains_term(text, &name) {
        score += 10;
    }
    for word in name.split_whitespace().filter(|w| w.chars().count() > 3) {
        if contains_term(text, word) {
            score += 3;
        }
    }
    if contains_term(text, &category.description.to_lowercase()) {
        score += 5;
    }
    for keyword in related_keywords(&category.name) {
        if contains_term(text, keyword) {
            score += 2;
        }
    }
    if score == 0 && is_general(&name) {
        score = 1;
    }

    score
}

fn match_subcategories(nodes: &[CategoryNode], text: &str, max: usize) -> Vec<SubcategoryMatch> {
    let mut matches: Vec<SubcategoryMatch> = nodes
        .iter()
        .filter_map(|node| {
            let mut score = 0;
            if contains_term(text, &node.name.to_lowercase()) {
                score += 5;
            }
            if contains_term(text, &node.description.to_lowercase()) {
                score += 3;
            }
            let matched_values: Vec<String> = node
                .values
                .iter()
                .filter(|v| contains_term(text, &v.to_lowercase()))
                .cloned()
                .collect();
            score += 2 * matched_values.len() as u32;

            let nested = match_subcategories(&node.subcategories, text, max);
            (score > 0 || !nested.is_empty()).then(|| SubcategoryMatch {
                name: node.name.clone(),
                description: node.description.clone(),
                score,
                matched_values,
                subcategories: nested,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    matches.truncate(max);
    matches
}

fn fallback_category(taxonomy: &CategoryTaxonomy, text: &str, max_subs: usize) -> CategoryMatch {
    let general = taxonomy.categories.iter().find(|c| {
        let name = c.name.to_lowercase();
        name.contains("general") || name.contains("consumer")
    });

    match general {
        Some(category) => CategoryMatch {
            name: category.name.clone(),
            description: category.description.clone(),
            score: 1,
            subcategories: match_subcategories(&category.subcategories, text, max_subs),
        },
        None => CategoryMatch {
            name: "General Consumer Products".to_string(),
            description: "Products intended for general consumer use".to_string(),
            score: 1,
            subcategories: vec![SubcategoryMatch {
                name: "Online Products".to_string(),
                description: "Products available for purchase online".to_string(),
                score: 1,
                matched_values: Vec::new(),
                subcategories: Vec::new(),
            }],
        },
    }
}

fn category_paths(category: &CategoryMatch) -> Vec<String> {
    fn walk(prefix: &str, subs: &[SubcategoryMatch], out: &mut Vec<String>) {
        for sub in subs {
            let path = format!("{} > {}", prefix, sub.name);
            out.push(path.clone());
            out.extend(sub.matched_values.iter().map(|v| format!("{} > {}", path, v)));
            walk(&path, &sub.subcategories, out);
        }
    }

    let mut out = vec![category.name.clone()];
    walk(&category.name, &category.subcategories, &mut out);
    out
}

fn related_keywords(category_name: &str) -> &'static [&'static str] {
    KEYWORD_MAP
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(category_name))
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

fn is_general(name: &str) -> bool {
    GENERAL_MARKERS.iter().any(|m| name.contains(m))
}

/// Whole-word, case-sensitive search for `term` in already-lowercased
/// `text`; a trailing `s` or `es` on the text side still matches.
fn contains_term(text: &str, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return false;
    }

    text.match_indices(term).any(|(start, _)| {
        let before_ok = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let rest = &text[start + term.len()..];
        let rest = rest
            .strip_prefix("es")
            .or_else(|| rest.strip_prefix('s'))
            .filter(|r| r.chars().next().is_none_or(|c| !c.is_alphanumeric()))
            .unwrap_or(rest);
        let after_ok = rest.chars().next().is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> CategoryTaxonomy {
        CategoryTaxonomy::new(vec![
            CategoryNode::new("Technology")
                .with_description("Interest in tech products")
                .with_subcategory(
                    CategoryNode::new("Consumer Electronics")
                        .with_values(["Headphones", "Smartphones", "Speakers"]),
                )
                .with_subcategory(
                    CategoryNode::new("Software").with_subcategory(
                        CategoryNode::new("Mobile Apps").with_values(["Fitness Apps"]),
                    ),
                ),
            CategoryNode::new("Interests").with_subcategory(
                CategoryNode::new("Fitness and Wellness").with_values(["Running", "Yoga"]),
            ),
            CategoryNode::new("Home").with_subcategory(CategoryNode::new("Furniture")),
            CategoryNode::new("General Consumer Products")
                .with_subcategory(CategoryNode::new("Everyday Items")),
        ])
    }

    #[test]
    fn test_contains_term_word_boundaries() {
        assert!(contains_term("wireless headphones for travel", "headphones"));
        assert!(contains_term("noise cancelling headphones", "headphone"));
        assert!(contains_term("great tech.", "tech"));
        assert!(!contains_term("technology", "tech"));
        assert!(!contains_term("homepage", "home"));
        assert!(!contains_term("anything", ""));
    }

    #[test]
    fn test_match_scores_and_paths() {
        let input = MatchInput::new("Wireless headphones with a companion fitness apps")
            .with_features(vec!["Bluetooth device".to_string()])
            .with_keywords(vec!["running".to_string()]);

        let outcome = match_categories(&taxonomy(), &input, MatchLimits::default());

        assert!(!outcome.used_fallback);
        let names: Vec<_> = outcome.categories.iter().map(|c| c.name.as_str()).collect();
        // Technology: "device" keyword (2); General: base score (1)
        assert_eq!(names, vec!["Technology", "General Consumer Products"]);

        let tech = &outcome.categories[0];
        assert_eq!(tech.score, 2);
        assert_eq!(tech.subcategories[0].name, "Consumer Electronics");
        assert_eq!(tech.subcategories[0].matched_values, vec!["Headphones"]);
        assert_eq!(tech.subcategories[1].name, "Software");
        assert_eq!(tech.subcategories[1].score, 0);
        assert_eq!(tech.subcategories[1].subcategories[0].name, "Mobile Apps");

        assert!(
            outcome
                .matched_paths
                .contains(&"Technology > Consumer Electronics > Headphones".to_string())
        );
        assert!(
            outcome
                .matched_paths
                .contains(&"Technology > Software > Mobile Apps > Fitness Apps".to_string())
        );
    }

    #[test]
    fn test_match_is_deterministic() {
        let input = MatchInput::new("Modern furniture for your home, a lifestyle tech gadget");
        let first = match_categories(&taxonomy(), &input, MatchLimits::default());
        let second = match_categories(&taxonomy(), &input, MatchLimits::default());
        assert_eq!(first, second);
        assert_eq!(first.categories[0].name, "Home");
    }

    #[test]
    fn test_limits_respected() {
        let input = MatchInput::new("home technology interests general");
        let outcome = match_categories(
            &taxonomy(),
            &input,
            MatchLimits {
                max_categories: 2,
                max_subcategories: 1,
            },
        );
        assert_eq!(outcome.categories.len(), 2);
        assert!(outcome.categories.iter().all(|c| c.subcategories.len() <= 1));
    }

    #[test]
    fn test_empty_input_lists_top_level() {
        let outcome = match_categories(&taxonomy(), &MatchInput::new("  "), MatchLimits::default());
        let names: Vec<_> = outcome.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["General Consumer Products", "Home", "Interests"]);
        assert!(outcome.categories.iter().all(|c| c.score == 5));
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let taxonomy = CategoryTaxonomy::new(vec![CategoryNode::new("Pets")]);
        let outcome = match_categories(&taxonomy, &MatchInput::new("quantum widget"), MatchLimits::default());
        assert!(outcome.used_fallback);
        assert_eq!(outcome.categories[0].name, "General Consumer Products");
        assert_eq!(outcome.categories[0].subcategories[0].name, "Online Products");
    }

    #[test]
    fn test_explore_modes() {
        let top = explore_top_level(&taxonomy());
        assert_eq!(top[0].name, "General Consumer Products");
        assert!(top.iter().all(|c| c.has_subcategories));

        let subs = explore_subcategories(&taxonomy(), "technology").unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].values, vec!["Headphones", "Smartphones", "Speakers"]);

        let nested = explore_subcategories(&taxonomy(), "Software").unwrap();
        assert_eq!(nested[0].name, "Mobile Apps");

        assert_eq!(
            explore_subcategories(&taxonomy(), "Pets"),
            Err(DomainError::UnknownCategory("Pets".to_string()))
        );
    }
}
