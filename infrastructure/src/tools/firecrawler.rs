//! `firecrawler` tool: scrape a product page and extract product data.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `url` | string | Yes | Product page URL (http/https) |
//! | `depth` | integer | No | Crawl depth 1-3 (default 1) |
//!
//! The page is fetched through Firecrawl's `/v1/scrape` endpoint as
//! markdown plus HTML. Markdown feeds the regex extractors; HTML is only
//! used to collect `<img>` sources.

use super::ApiEndpoint;
use andy_domain::tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use andy_domain::{ScrapedPage, extract_product, validate_product_url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

/// Tool name constant
pub const FIRECRAWLER: &str = "firecrawler";

const DEFAULT_DEPTH: i64 = 1;
const MAX_DEPTH: i64 = 3;

/// Get the tool definition for firecrawler
pub fn firecrawler_definition() -> ToolDefinition {
    ToolDefinition::new(
        FIRECRAWLER,
        "Scrape a product page and extract its title, price, description, features, specifications and images.",
    )
    .with_parameter(
        ToolParameter::new("url", "Product page URL starting with http:// or https://", true)
            .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("depth", "Crawl depth between 1 and 3", false)
            .with_type("integer")
            .with_default(DEFAULT_DEPTH),
    )
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 2],
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    html: Option<String>,
    /// Older API versions return plain text here
    content: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    metadata: PageMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageMetadata {
    title: Option<String>,
    og_image: Option<String>,
}

/// Execute the firecrawler tool
pub async fn execute_firecrawler(
    client: &reqwest::Client,
    endpoint: &ApiEndpoint,
    call: &ToolCall,
) -> ToolResult {
    let raw_url = match call.require_string("url") {
        Ok(u) => u,
        Err(e) => return ToolResult::failure(FIRECRAWLER, ToolError::validation(e)),
    };

    let url = match validate_product_url(raw_url) {
        Ok(u) => u,
        Err(e) => {
            warn!(url = raw_url, error = %e, "Rejected product URL");
            return ToolResult::failure(FIRECRAWLER, e.into());
        }
    };

    let depth = match call.arguments.get("depth") {
        None | Some(serde_json::Value::Null) => DEFAULT_DEPTH,
        Some(v) => match v.as_i64() {
            Some(d) if (1..=MAX_DEPTH).contains(&d) => d,
            _ => {
                return ToolResult::failure(
                    FIRECRAWLER,
                    ToolError::validation(format!(
                        "depth must be an integer between 1 and {}",
                        MAX_DEPTH
                    )),
                );
            }
        },
    };

    let api_key = match endpoint.require_key() {
        Ok(k) => k,
        Err(e) => return ToolResult::failure(FIRECRAWLER, e),
    };

    info!(url = %url, depth, "Scraping product page");
    let (page, bytes) = match scrape(client, endpoint, api_key, url.as_str()).await {
        Ok(p) => p,
        Err(e) => {
            warn!(url = %url, error = %e, "Scrape failed");
            return ToolResult::failure(FIRECRAWLER, e);
        }
    };
    debug!(url = %url, bytes, markdown_chars = page.markdown.len(), "Scrape response received");

    let extraction = extract_product(&page);
    for warning in &extraction.warnings {
        warn!(url = %url, %warning, "Product parsing warning");
    }

    ToolResult::success(
        FIRECRAWLER,
        json!({
            "product": extraction.product,
            "warnings": extraction.warnings,
            "depth": depth,
        }),
    )
    .with_bytes(bytes)
}

async fn scrape(
    client: &reqwest::Client,
    endpoint: &ApiEndpoint,
    api_key: &str,
    url: &str,
) -> Result<(ScrapedPage, usize), ToolError> {
    let response = client
        .post(endpoint.url("/v1/scrape"))
        .bearer_auth(api_key)
        .json(&ScrapeRequest {
            url,
            formats: ["markdown", "html"],
        })
        .send()
        .await
        .map_err(|e| {
            ToolError::upstream(format!("Failed to reach the scraping service: {}", e.without_url()))
        })?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| {
            ToolError::upstream(format!("Failed to read scrape response: {}", e.without_url()))
        })?;

    if !status.is_success() {
        return Err(ToolError::upstream(format!(
            "Scraping service returned {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ))
        .with_details(String::from_utf8_lossy(&body).chars().take(200).collect::<String>()));
    }

    let parsed: ScrapeResponse = serde_json::from_slice(&body)
        .map_err(|e| ToolError::upstream(format!("Unexpected scrape response: {}", e)))?;

    let data = match parsed.data {
        Some(data) if parsed.success || parsed.error.is_none() => data,
        _ => {
            return Err(ToolError::upstream(format!(
                "Could not retrieve content from {}: {}",
                url,
                parsed.error.as_deref().unwrap_or("no data returned")
            )));
        }
    };

    let page = to_page(url, data).ok_or_else(|| {
        ToolError::upstream(format!("No content was returned for {}", url))
    })?;
    Ok((page, body.len()))
}

fn to_page(url: &str, data: ScrapeData) -> Option<ScrapedPage> {
    let markdown = data
        .markdown
        .or(data.content)
        .filter(|m| !m.trim().is_empty());
    let html = data.html.filter(|h| !h.trim().is_empty());
    if markdown.is_none() && html.is_none() {
        return None;
    }

    let mut images: Vec<String> = data.metadata.og_image.into_iter().collect();
    images.extend(data.images);
    if let Some(html) = &html {
        images.extend(html_image_sources(html, url));
    }

    Some(ScrapedPage {
        url: url.to_string(),
        markdown: markdown
            .or_else(|| html.as_deref().map(html_to_text))
            .unwrap_or_default(),
        title: data.metadata.title,
        images,
    })
}

/// `<img src>` values, resolved against the page URL
pub fn html_image_sources(html: &str, page_url: &str) -> Vec<String> {
    use scraper::{Html, Selector};

    let Ok(selector) = Selector::parse("img[src]") else {
        return Vec::new();
    };
    let base = url::Url::parse(page_url).ok();
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| !src.starts_with("data:"))
        .filter_map(|src| match &base {
            Some(base) => base.join(src).ok().map(|u| u.to_string()),
            None => Some(src.to_string()),
        })
        .collect()
}

/// Readable text of an HTML document, one block per line
fn html_to_text(html: &str) -> String {
    use scraper::{Html, Selector};

    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("h1, h2, h3, p, li, td, th") else {
        return String::new();
    };

    document
        .select(&selector)
        .map(|el| {
            let text = el.text().collect::<Vec<_>>().join(" ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            match el.value().name() {
                "h1" => format!("# {}", text),
                "h2" | "h3" => format!("## {}", text),
                "li" => format!("- {}", text),
                _ => text,
            }
        })
        .filter(|line| !line.trim_start_matches(['#', '-', ' ']).is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
