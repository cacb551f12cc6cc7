//! Product data extraction from scraped page content.
//!
//! All functions here are pure: they take the markdown (and whatever
//! metadata the scraper returned) and produce a [`ProductData`] whose
//! fields are `None`/empty when the pattern was not found. Each miss is
//! reported as a [`ParsingWarning`] instead of failing the extraction.
//!
//! | Field | Source |
//! |-------|--------|
//! | title | page metadata title, else first non-empty markdown line |
//! | price | first currency amount or `Price:`/`Cost:` label, document order |
//! | features | bullet / numbered list items, max 10 |
//! | description | first prose paragraph, max 500 chars |
//! | specifications | two-column markdown table rows, max 20 |
//! | images | metadata images then markdown images, absolute URLs, max 5 |

use crate::core::string::truncate_chars;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const MAX_FEATURES: usize = 10;
pub const MAX_IMAGES: usize = 5;
pub const MAX_SPECIFICATIONS: usize = 20;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:price|cost)\b\s*:?\s*(?P<labeled>[$€£]?\s?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?)|(?P<symbol>[$€£]\s?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?)",
    )
    .expect("valid price regex")
});

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-•*+]|\d+[.)])\s+(.+?)\s*$").expect("valid list item regex")
});

static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("valid link regex"));

static MARKDOWN_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[[^\]]*\]\(\s*(\S+?)(?:\s+"[^"]*")?\s*\)"#).expect("valid image regex")
});

static TABLE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|?[\s:|-]+\|?\s*$").expect("valid separator regex"));

/// Raw page content as returned by the scraper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    /// The page that was scraped
    pub url: String,
    /// Markdown rendering of the page
    pub markdown: String,
    /// Title from page metadata, when the scraper provided one
    pub title: Option<String>,
    /// Image URLs found outside the markdown (og:image, `<img>` tags)
    pub images: Vec<String>,
}

/// Structured product data; `None` means the field was not found
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductData {
    pub url: String,
    pub title: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub specifications: BTreeMap<String, String>,
    pub images: Vec<String>,
}

/// Non-fatal note about a field extraction could not fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsingWarning {
    MissingTitle,
    MissingPrice,
    MissingDescription,
    NoFeatures,
    NoImages,
}

impl ParsingWarning {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParsingWarning::MissingTitle => "no title found",
            ParsingWarning::MissingPrice => "no price found",
            ParsingWarning::MissingDescription => "no description found",
            ParsingWarning::NoFeatures => "no feature list found",
            ParsingWarning::NoImages => "no images found",
        }
    }
}

impl std::fmt::Display for ParsingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extraction output: the data plus warnings for every miss
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub product: ProductData,
    pub warnings: Vec<ParsingWarning>,
}

/// Run every extractor over a scraped page.
pub fn extract_product(page: &ScrapedPage) -> Extraction {
    let markdown = page.markdown.as_str();

    let title = page
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| extract_title(markdown));

    let mut images = page.images.clone();
    images.extend(extract_markdown_images(markdown));

    let product = ProductData {
        url: page.url.clone(),
        title,
        price: extract_price(markdown),
        description: extract_description(markdown),
        features: extract_features(markdown),
        specifications: extract_specifications(markdown),
        images: normalize_images(images),
    };

    let mut warnings = Vec::new();
    if product.title.is_none() {
        warnings.push(ParsingWarning::MissingTitle);
    }
    if product.price.is_none() {
        warnings.push(ParsingWarning::MissingPrice);
    }
    if product.description.is_none() {
        warnings.push(ParsingWarning::MissingDescription);
    }
    if product.features.is_empty() {
        warnings.push(ParsingWarning::NoFeatures);
    }
    if product.images.is_empty() {
        warnings.push(ParsingWarning::NoImages);
    }

    Extraction { product, warnings }
}

/// First non-empty markdown line, heading markers stripped.
pub fn extract_title(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .map(|line| clean_inline(line.trim().trim_start_matches('#').trim()))
        .find(|line| line.chars().any(char::is_alphanumeric))
}

/// First price in document order.
///
/// A `Price:`/`Cost:` label is matched but not included in the value,
/// and whitespace between the currency symbol and digits is dropped.
pub fn extract_price(text: &str) -> Option<String> {
    let caps = PRICE_RE.captures(text)?;
    let value = caps.name("labeled").or_else(|| caps.name("symbol"))?;
    Some(value.as_str().split_whitespace().collect())
}

/// Bullet and numbered list items in document order, deduplicated, max 10.
pub fn extract_features(markdown: &str) -> Vec<String> {
    let mut features: Vec<String> = Vec::new();
    for line in markdown.lines() {
        let Some(caps) = LIST_ITEM_RE.captures(line) else {
            continue;
        };
        let item = clean_inline(&caps[1]);
        if !item.chars().any(char::is_alphanumeric) || features.contains(&item) {
            continue;
        }
        features.push(item);
        if features.len() == MAX_FEATURES {
            break;
        }
    }
    features
}

/// First paragraph that is prose: not a heading, list, table or image.
pub fn extract_description(markdown: &str) -> Option<String> {
    paragraphs(markdown)
        .into_iter()
        .find(|para| is_prose(para))
        .map(|para| {
            let joined = para
                .iter()
                .map(|line| clean_inline(line.trim()))
                .collect::<Vec<_>>()
                .join(" ");
            truncate_chars(&joined, MAX_DESCRIPTION_CHARS).trim().to_string()
        })
        .filter(|d| !d.is_empty())
}

/// Two-column markdown table rows as key/value pairs.
///
/// Header rows (followed by a separator row) and separator rows are
/// skipped; the first occurrence of a key wins.
pub fn extract_specifications(markdown: &str) -> BTreeMap<String, String> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut specs = BTreeMap::new();

    for (i, line) in lines.iter().enumerate() {
        if specs.len() == MAX_SPECIFICATIONS {
            break;
        }
        if TABLE_SEPARATOR_RE.is_match(line) {
            continue;
        }
        let Some([key, value]) = table_cells(line) else {
            continue;
        };
        let is_header = lines
            .get(i + 1)
            .is_some_and(|next| TABLE_SEPARATOR_RE.is_match(next) && next.contains('-'));
        if is_header || key.is_empty() || value.is_empty() {
            continue;
        }
        specs.entry(key).or_insert(value);
    }

    specs
}

/// Image URLs written as `![alt](url)` in the markdown.
pub fn extract_markdown_images(markdown: &str) -> Vec<String> {
    MARKDOWN_IMAGE_RE
        .captures_iter(markdown)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn normalize_images(images: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for image in images {
        let image = image.trim().to_string();
        let lower = image.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) || out.contains(&image)
        {
            continue;
        }
        out.push(image);
        if out.len() == MAX_IMAGES {
            break;
        }
    }
    out
}

fn table_cells(line: &str) -> Option<[String; 2]> {
    let trimmed = line.trim();
    if !trimmed.starts_with('|') || !trimmed.ends_with('|') || trimmed.len() < 2 {
        return None;
    }
    let cells: Vec<&str> = trimmed[1..trimmed.len() - 1].split('|').collect();
    match cells.as_slice() {
        [key, value] => Some([
            clean_inline(key.trim()).trim_end_matches(':').to_string(),
            clean_inline(value.trim()),
        ]),
        _ => None,
    }
}

fn paragraphs(markdown: &str) -> Vec<Vec<&str>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for line in markdown.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn is_prose(para: &[&str]) -> bool {
    let Some(first) = para.first().map(|l| l.trim()) else {
        return false;
    };
    if first.starts_with('#')
        || first.starts_with('|')
        || first.starts_with('>')
        || first.starts_with("```")
        || LIST_ITEM_RE.is_match(first)
    {
        return false;
    }
    let joined = para.join(" ");
    let text = clean_inline(&MARKDOWN_IMAGE_RE.replace_all(&joined, ""));
    text.chars().filter(|c| c.is_alphabetic()).count() >= 3
}

/// Strip inline markdown: links/images become their text, emphasis
/// markers and backticks are removed.
fn clean_inline(text: &str) -> String {
    let without_links = MARKDOWN_LINK_RE.replace_all(text, "$1");
    without_links
        .replace("**", "")
        .replace("__", "")
        .replace('`', "")
        .trim()
        .to_string()
}
