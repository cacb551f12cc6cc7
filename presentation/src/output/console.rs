//! Console output formatter for workflow replies and status

use andy_application::{ToolAvailability, WorkflowReply, WorkflowStatus};
use andy_domain::{ToolSpec, WorkflowStage};
use colored::Colorize;

/// Formats workflow output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Assistant reply, tagged with the stage it left the conversation in
    pub fn format_reply(reply: &WorkflowReply) -> String {
        format!(
            "{} {}\n\n{}\n",
            "Andy".cyan().bold(),
            Self::stage_tag(reply.stage),
            reply.message
        )
    }

    /// Dashboard snapshot as a compact text block
    pub fn format_status(status: &WorkflowStatus) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Session Status"));
        output.push_str(&format!(
            "{} {} ({:?})\n",
            "Stage:".cyan().bold(),
            status.stage_label,
            status.status
        ));
        if let Some(url) = &status.product_url {
            output.push_str(&format!("{} {}\n", "URL:".cyan().bold(), url));
        }
        if let Some(error) = &status.last_error {
            output.push_str(&format!("{} {}\n", "Last error:".red().bold(), error));
        }

        if let Some(product) = &status.product_data {
            output.push_str(&format!("\n{}\n", "Product".yellow().bold()));
            output.push_str(&format!(
                "  Title: {}\n",
                product.title.as_deref().unwrap_or("-")
            ));
            output.push_str(&format!(
                "  Price: {}\n",
                product.price.as_deref().unwrap_or("-")
            ));
            output.push_str(&format!("  Features: {}\n", product.features.len()));
        }

        if let Some(market) = &status.market_data {
            output.push_str(&format!("\n{}\n", "Market".yellow().bold()));
            let competitors: Vec<&str> =
                market.competitors.iter().map(|c| c.name.as_str()).collect();
            output.push_str(&format!("  Competitors: {}\n", Self::list(&competitors)));
            let keywords: Vec<&str> = market.keywords.iter().map(String::as_str).collect();
            output.push_str(&format!("  Keywords: {}\n", Self::list(&keywords)));
        }

        if !status.categories.is_empty() {
            output.push_str(&format!("\n{}\n", "Categories".yellow().bold()));
            for category in &status.categories {
                let subs: Vec<&str> = category
                    .subcategories
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect();
                output.push_str(&format!(
                    "  * {} [{}]: {}\n",
                    category.name,
                    category.score,
                    Self::list(&subs)
                ));
            }
        }

        if !status.audience_segments.is_empty() {
            output.push_str(&format!("\n{}\n", "Audience Segments".yellow().bold()));
            for segment in &status.audience_segments {
                output.push_str(&format!("  * {}\n", segment.name));
            }
        }

        if !status.strategies.is_empty() {
            output.push_str(&format!("\n{}\n", "Strategies".green().bold()));
            for strategy in &status.strategies {
                output.push_str(&format!("  {}. {}\n", strategy.id, strategy.content));
            }
        }

        output
    }

    /// Registered tools with their availability
    pub fn format_tools(spec: &ToolSpec, availability: &[ToolAvailability]) -> String {
        let mut output = Self::header("Tools");
        for entry in availability {
            let mark = if entry.available {
                "v".green()
            } else {
                "x".red()
            };
            let description = spec
                .get(entry.tool.as_str())
                .map(|d| d.description.as_str())
                .unwrap_or_default();
            output.push_str(&format!(
                "  {} {} - {}\n",
                mark,
                entry.tool.as_str().bold(),
                description
            ));
            if let Some(reason) = &entry.reason {
                output.push_str(&format!("      {}\n", reason.dimmed()));
            }
        }
        output
    }

    /// Status as pretty JSON
    pub fn format_status_json(status: &WorkflowStatus) -> String {
        serde_json::to_string_pretty(status).unwrap_or_else(|_| "{}".to_string())
    }

    fn stage_tag(stage: WorkflowStage) -> String {
        let tag = format!("[{}]", stage.label());
        match stage {
            WorkflowStage::Done => tag.green().to_string(),
            WorkflowStage::AwaitingUrl => tag.dimmed().to_string(),
            _ => tag.yellow().to_string(),
        }
    }

    fn list(items: &[&str]) -> String {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    }

    fn header(title: &str) -> String {
        format!("{}\n", format!("=== {} ===", title).cyan().bold())
    }
}
