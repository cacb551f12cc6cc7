//! Prompt and message templates for each workflow stage

use crate::market::MarketData;
use crate::product::ProductData;
use crate::taxonomy::{AudienceSegment, MatchOutcome};
use crate::workflow::Recommendation;

const NOT_AVAILABLE: &str = "N/A";

/// Templates for the assistant's fixed replies and language model prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// First message of every conversation
    pub fn greeting() -> &'static str {
        "Hi there! I'm Audience Andy. Share a product URL with me, and I'll help you identify target audiences and marketing strategies for it."
    }

    /// Reply when a URL is expected but the message has none
    pub fn url_required() -> &'static str {
        "Please share a product URL starting with http:// or https:// so I can start the analysis."
    }

    /// Reply after `reset`
    pub fn reset_done() -> &'static str {
        "Okay, I've cleared the previous analysis. Share a new product URL whenever you're ready."
    }

    /// Reply to a blank message
    pub fn empty_message() -> &'static str {
        "I didn't catch that. Please type a message."
    }

    /// Reply when the language model could not answer
    pub fn model_error(message: &str) -> String {
        format!(
            "I'm having trouble generating a response right now ({}). Please try again.",
            message
        )
    }

    /// Reply in the middle of a run when a new URL is expected after a failed scrape
    pub fn new_url_required() -> &'static str {
        "Please send another product URL (starting with http:// or https://), or say \"cancel\" to start over."
    }

    /// Stage report after the recommendation arrived
    pub fn recommendation_ready(strategy_count: usize) -> String {
        format!(
            "I've put together {} marketing {} based on the analysis.",
            strategy_count,
            if strategy_count == 1 { "strategy" } else { "strategies" }
        )
    }

    /// Reply when a stage failed and the user is asked to retry
    pub fn stage_failed(stage_label: &str, message: &str) -> String {
        format!(
            "I ran into a problem while {}: {}\n\nSend any message to try this step again, or say \"cancel\" to start over.",
            stage_label.to_lowercase(),
            message
        )
    }

    /// Reply when scraping failed and a new URL is needed
    pub fn scrape_failed(message: &str) -> String {
        format!(
            "I couldn't analyze that page: {}\n\nPlease send another product URL.",
            message
        )
    }

    /// System prompt for the recommendation call
    pub fn recommendation_system() -> &'static str {
        r#"You are Audience Andy, a marketing strategy expert specializing in audience segmentation.
Generate specific, actionable marketing strategies based on product and audience data.
Separate each strategy with a blank line. For each strategy cover the target audience
segment, recommended channels, key messaging points and suggested ad formats."#
    }

    /// User prompt combining every stage's output
    pub fn recommendation_prompt(
        product: &ProductData,
        market: &MarketData,
        categories: &MatchOutcome,
    ) -> String {
        let mut prompt = String::from(
            "Based on the following product and audience data, generate 3-5 marketing strategy recommendations.\n\n",
        );

        prompt.push_str("## Product\n");
        prompt.push_str(&Self::product_facts(product));

        prompt.push_str("\n## Market Research\n");
        prompt.push_str(&format!("- Search query: {}\n", market.query));
        prompt.push_str(&format!(
            "- Competitors: {}\n",
            join_or(
                market.competitors.iter().map(|c| c.name.as_str()),
                "Similar products in the market"
            )
        ));
        prompt.push_str(&format!(
            "- Related keywords: {}\n",
            join_or(market.keywords.iter().map(String::as_str), NOT_AVAILABLE)
        ));

        prompt.push_str("\n## Matched Categories\n");
        for path in &categories.matched_paths {
            prompt.push_str(&format!("- {}\n", path));
        }

        prompt.push_str("\n## Audience Segments\n");
        for segment in &categories.audience_segments {
            prompt.push_str(&format!("- {}: {}\n", segment.name, segment.description));
        }

        prompt
    }

    /// System prompt for questions after the analysis is complete
    pub fn follow_up_system(analysis_summary: &str) -> String {
        format!(
            r#"You are Audience Andy, an AI assistant specializing in audience segmentation and marketing strategy.
The user is asking follow-up questions about the completed analysis below. Use the accumulated data
to give detailed, specific answers about the product, audience segments or marketing strategies.
If they want to analyze another product, ask them to share the new URL with the word "analyze".

{}"#,
            analysis_summary
        )
    }

    /// Stage report after scraping
    pub fn product_report(product: &ProductData) -> String {
        format!(
            "I've analyzed the product page. Here's what I found:\n\n{}",
            Self::product_facts(product)
        )
    }

    /// Stage report after market research
    pub fn market_report(market: &MarketData) -> String {
        let competitors = if market.competitors.is_empty() {
            "- Similar products in the market\n".to_string()
        } else {
            market
                .competitors
                .iter()
                .map(|c| format!("- {} ({})\n", c.name, c.domain))
                .collect()
        };
        format!(
            "Market research for \"{}\" ({} results):\n\n**Competitors**\n{}\n**Related keywords:** {}",
            market.query,
            market.result_count,
            competitors,
            join_or(market.keywords.iter().map(String::as_str), NOT_AVAILABLE)
        )
    }

    /// Stage report after category matching
    pub fn category_report(outcome: &MatchOutcome) -> String {
        let mut report = String::from("I've mapped the product to these audience categories:\n\n");
        for category in &outcome.categories {
            report.push_str(&format!("- **{}** (score {})\n", category.name, category.score));
            for sub in &category.subcategories {
                report.push_str(&format!("  - {}\n", sub.name));
            }
        }
        report.push_str("\n**Audience segments**\n");
        report.push_str(&Self::segment_list(&outcome.audience_segments));
        report
    }

    /// Markdown summary of the whole analysis
    pub fn analysis_summary(
        product: &ProductData,
        market: Option<&MarketData>,
        categories: Option<&MatchOutcome>,
        recommendation: Option<&Recommendation>,
    ) -> String {
        let title = product.title.as_deref().unwrap_or("the analyzed product");
        let mut doc = format!("# Complete Analysis for {}\n\n## Product Overview\n", title);
        doc.push_str(&Self::product_facts(product));

        if let Some(market) = market {
            doc.push_str("\n## Market Analysis\n");
            doc.push_str(&format!(
                "- **Top Competitors:** {}\n- **Related Keywords:** {}\n",
                join_or(market.competitors.iter().map(|c| c.name.as_str()), NOT_AVAILABLE),
                join_or(market.keywords.iter().take(8).map(String::as_str), NOT_AVAILABLE)
            ));
        }

        if let Some(outcome) = categories {
            doc.push_str("\n## Category Mapping\n");
            for category in &outcome.categories {
                let subs = category
                    .subcategories
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>();
                if subs.is_empty() {
                    doc.push_str(&format!("- **{}**\n", category.name));
                } else {
                    doc.push_str(&format!("- **{}:** {}\n", category.name, subs.join(", ")));
                }
            }
            doc.push_str("\n## Audience Segments\n");
            doc.push_str(&Self::segment_list(&outcome.audience_segments));
        }

        if let Some(recommendation) = recommendation {
            doc.push_str("\n## Marketing Recommendations\n");
            for strategy in &recommendation.strategies {
                doc.push_str(&format!("\n### Strategy {}\n{}\n", strategy.id, strategy.content));
            }
        }

        doc
    }

    /// Closing line after the summary
    pub fn analysis_complete() -> &'static str {
        "You can now ask me questions about this analysis, or share a new URL with \"analyze\" to look at another product."
    }

    fn product_facts(product: &ProductData) -> String {
        let features = if product.features.is_empty() {
            "Product available online".to_string()
        } else {
            product
                .features
                .iter()
                .take(5)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "- **Name:** {}\n- **Price:** {}\n- **Key Features:** {}\n- **Description:** {}\n",
            product.title.as_deref().unwrap_or(NOT_AVAILABLE),
            product.price.as_deref().unwrap_or(NOT_AVAILABLE),
            features,
            product.description.as_deref().unwrap_or(NOT_AVAILABLE),
        )
    }

    fn segment_list(segments: &[AudienceSegment]) -> String {
        segments
            .iter()
            .map(|s| format!("- **{}:** {}\n", s.name, s.description))
            .collect()
    }
}

fn join_or<'a>(items: impl Iterator<Item = &'a str>, empty: &str) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        empty.to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Competitor;
    use crate::taxonomy::{CategoryNode, CategoryTaxonomy, MatchInput, MatchLimits, match_categories};

    fn product() -> ProductData {
        ProductData {
            url: "https://acme.io/p/1".to_string(),
            title: Some("Trail Runner".to_string()),
            price: Some("$89.00".to_string()),
            features: vec!["Grippy sole".to_string()],
            ..Default::default()
        }
    }

    fn market() -> MarketData {
        MarketData {
            query: "Trail Runner".to_string(),
            competitors: vec![Competitor {
                name: "Salomon".to_string(),
                domain: "salomon.com".to_string(),
                occurrences: 2,
                title: "Salomon shoes".to_string(),
            }],
            keywords: vec!["hiking".to_string()],
            result_count: 10,
        }
    }

    fn outcome() -> MatchOutcome {
        let taxonomy = CategoryTaxonomy::new(vec![CategoryNode::new("Interests").with_subcategory(
            CategoryNode::new("Outdoor Recreation").with_values(["Hiking"]),
        )]);
        match_categories(
            &taxonomy,
            &MatchInput::new("outdoor recreation interests for hiking"),
            MatchLimits::default(),
        )
    }

    #[test]
    fn test_recommendation_prompt_contains_all_sections() {
        let prompt = PromptTemplate::recommendation_prompt(&product(), &market(), &outcome());
        assert!(prompt.contains("Trail Runner"));
        assert!(prompt.contains("$89.00"));
        assert!(prompt.contains("Salomon"));
        assert!(prompt.contains("hiking"));
        assert!(prompt.contains("Interests > Outdoor Recreation > Hiking"));
        assert!(prompt.contains("Audience Segments"));
    }

    #[test]
    fn test_product_report_placeholders() {
        let report = PromptTemplate::product_report(&ProductData::default());
        assert!(report.contains("**Name:** N/A"));
        assert!(report.contains("Product available online"));
    }

    #[test]
    fn test_market_report_without_competitors() {
        let report = PromptTemplate::market_report(&MarketData::default());
        assert!(report.contains("Similar products in the market"));
    }

    #[test]
    fn test_analysis_summary_sections() {
        let rec = Recommendation::parse("Social first\n\nInfluencer push");
        let doc = PromptTemplate::analysis_summary(
            &product(),
            Some(&market()),
            Some(&outcome()),
            Some(&rec),
        );
        assert!(doc.starts_with("# Complete Analysis for Trail Runner"));
        assert!(doc.contains("## Market Analysis"));
        assert!(doc.contains("**Interests:** Outdoor Recreation"));
        assert!(doc.contains("### Strategy 2\nInfluencer push"));
    }

    #[test]
    fn test_stage_failed_message() {
        let msg = PromptTemplate::stage_failed("Researching the market", "API down");
        assert!(msg.starts_with("I ran into a problem while researching the market: API down"));
    }
}
