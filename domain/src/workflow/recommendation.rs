//! The language model's final recommendation

use serde::{Deserialize, Serialize};

/// One marketing strategy block of the recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: usize,
    pub content: String,
}

/// Audience and strategy recommendation produced in the summarizing stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub strategies: Vec<Strategy>,
}

impl Recommendation {
    /// Split the answer into blank-line separated strategy blocks.
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let strategies = text
            .replace("\r\n", "\n")
            .split("\n\n")
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .enumerate()
            .map(|(i, block)| Strategy {
                id: i + 1,
                content: block.to_string(),
            })
            .collect();
        Self { text, strategies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blocks() {
        let rec = Recommendation::parse("1. Social ads\r\n\r\n\n2. Influencers\n\n  \n\n3. Email");
        let contents: Vec<_> = rec.strategies.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["1. Social ads", "2. Influencers", "3. Email"]);
        assert_eq!(rec.strategies[2].id, 3);
    }

    #[test]
    fn test_parse_empty() {
        assert!(Recommendation::parse("   ").strategies.is_empty());
    }
}
