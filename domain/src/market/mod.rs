//! Market domain: competitor and keyword signals from search results.
//!
//! [`extract_market`] is pure; the search API call lives in infrastructure.

use crate::core::string::title_case;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

pub const MAX_COMPETITORS: usize = 5;
pub const MAX_KEYWORDS: usize = 10;

/// Retailers whose presence says nothing about competing brands.
pub const MARKETPLACES: &[&str] = &["amazon", "ebay", "walmart", "bestbuy", "target"];

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "is", "are", "of", "for", "in", "to", "with", "this",
    "that", "from", "your", "have", "will", "more", "about", "than", "they", "their", "what",
    "when", "which", "also",
];

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// A single organic search result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// A brand seen in the results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub domain: String,
    /// How many results pointed at this brand
    pub occurrences: usize,
    /// Title of the first result for this brand
    pub title: String,
}

/// Market signals for one query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub query: String,
    pub competitors: Vec<Competitor>,
    pub keywords: Vec<String>,
    pub result_count: usize,
}

/// Build competitor and keyword lists from organic results.
///
/// Competitors are ordered by occurrence count, ties broken by first
/// appearance. Keywords keep first-appearance order.
pub fn extract_market(query: &str, results: &[OrganicResult]) -> MarketData {
    MarketData {
        query: query.to_string(),
        competitors: extract_competitors(results),
        keywords: extract_keywords(query, results),
        result_count: results.len(),
    }
}

pub fn extract_competitors(results: &[OrganicResult]) -> Vec<Competitor> {
    let mut order: Vec<Competitor> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in results {
        let Some(domain) = domain_of(&result.link) else {
            continue;
        };
        let Some(label) = domain.split('.').next().filter(|l| !l.is_empty()) else {
            continue;
        };
        let key = label.to_lowercase();
        if MARKETPLACES.contains(&key.as_str()) {
            continue;
        }

        match index.get(&key) {
            Some(&i) => order[i].occurrences += 1,
            None => {
                index.insert(key, order.len());
                order.push(Competitor {
                    name: title_case(label),
                    domain: domain.clone(),
                    occurrences: 1,
                    title: result.title.trim().to_string(),
                });
            }
        }
    }

    // stable sort keeps first-appearance order among equal counts
    order.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    order.truncate(MAX_COMPETITORS);
    order
}

pub fn extract_keywords(query: &str, results: &[OrganicResult]) -> Vec<String> {
    let query = query.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    for result in results {
        let text = format!("{} {}", result.title, result.snippet).to_lowercase();
        for word in WORD_RE.find_iter(&text).map(|m| m.as_str()) {
            if word.chars().count() <= 3
                || STOPWORDS.contains(&word)
                || query.contains(word)
                || word.chars().all(|c| c.is_ascii_digit() || c == '_')
                || keywords.iter().any(|k| k == word)
            {
                continue;
            }
            keywords.push(word.to_string());
            if keywords.len() == MAX_KEYWORDS {
                return keywords;
            }
        }
    }

    keywords
}

/// Host of `link` without a leading `www.`
pub fn domain_of(link: &str) -> Option<String> {
    let url = url::Url::parse(link.trim()).ok()?;
    let host = url.host_str()?.to_lowercase();
    Some(host.trim_start_matches("www.").to_string())
}
