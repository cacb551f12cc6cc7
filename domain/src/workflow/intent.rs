//! What a user message asks for, independent of the current stage.

use crate::product::extract_url;

const ANALYSIS_KEYWORDS: &[&str] = &[
    "analyze", "analyse", "analysis", "research", "check", "explore", "look at", "review",
    "evaluate", "assess",
];

const CANCEL_WORDS: &[&str] = &["cancel", "stop", "reset", "restart"];

/// Longest message still treated as a bare cancel command
const CANCEL_MAX_WORDS: usize = 3;

/// Signals found in a user message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageIntent {
    /// First URL in the message
    pub url: Option<String>,
    /// The message asks for an analysis ("analyze", "review", ...)
    pub wants_analysis: bool,
    /// A short message asking to abandon the current run
    pub cancel: bool,
}

impl MessageIntent {
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric() && c != '/' && c != ':' && c != '.')
            .filter(|w| !w.is_empty())
            .collect();

        let cancel = words.len() <= CANCEL_MAX_WORDS
            && words
                .iter()
                .any(|w| CANCEL_WORDS.contains(&w.trim_start_matches('/')));

        Self {
            url: extract_url(text).map(str::to_string),
            wants_analysis: ANALYSIS_KEYWORDS.iter().any(|k| lower.contains(k)),
            cancel,
        }
    }

    /// A URL plus an explicit request to analyze it
    pub fn is_new_analysis(&self) -> bool {
        self.url.is_some() && self.wants_analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_and_keyword() {
        let intent = MessageIntent::parse("Can you analyze https://acme.io/p/1 ?");
        assert_eq!(intent.url.as_deref(), Some("https://acme.io/p/1"));
        assert!(intent.wants_analysis);
        assert!(intent.is_new_analysis());
        assert!(!intent.cancel);
    }

    #[test]
    fn test_url_without_keyword() {
        let intent = MessageIntent::parse("https://acme.io/p/1");
        assert!(intent.url.is_some());
        assert!(!intent.is_new_analysis());
    }

    #[test]
    fn test_cancel_only_for_short_messages() {
        assert!(MessageIntent::parse("stop").cancel);
        assert!(MessageIntent::parse("Cancel please!").cancel);
        assert!(MessageIntent::parse("/reset").cancel);
        assert!(!MessageIntent::parse("how do I stop churn among new customers?").cancel);
    }

    #[test]
    fn test_scheme_word_is_not_a_url() {
        let intent = MessageIntent::parse("Does your site support https?");
        assert_eq!(intent.url, None);
        assert!(!intent.is_new_analysis());

        let intent = MessageIntent::parse("please review my httpserver product");
        assert_eq!(intent.url, None);
        assert!(intent.wants_analysis);
        assert!(!intent.is_new_analysis());
    }

    #[test]
    fn test_plain_question() {
        let intent = MessageIntent::parse("What channels work best?");
        assert_eq!(intent, MessageIntent::default());
    }
}
