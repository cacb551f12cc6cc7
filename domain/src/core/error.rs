//! Domain error types

use crate::tool::ToolError;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid URL format. Please provide a URL starting with http:// or https://.")]
    InvalidUrlScheme,

    #[error("Invalid URL: {0}")]
    MalformedUrl(String),

    #[error(
        "The URL appears to be a fictional or example domain. Please provide a real product URL."
    )]
    PlaceholderDomain(String),

    #[error("Category '{0}' was not found in the taxonomy")]
    UnknownCategory(String),

    #[error("Invalid taxonomy: {0}")]
    InvalidTaxonomy(String),
}

impl DomainError {
    /// Whether the user can fix this by sending a different URL
    pub fn is_url_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidUrlScheme
                | DomainError::MalformedUrl(_)
                | DomainError::PlaceholderDomain(_)
        )
    }
}

impl From<DomainError> for ToolError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::InvalidTaxonomy(_) => ToolError::configuration(err.to_string()),
            _ => ToolError::validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolErrorKind;

    #[test]
    fn test_url_error_messages() {
        assert_eq!(
            DomainError::InvalidUrlScheme.to_string(),
            "Invalid URL format. Please provide a URL starting with http:// or https://."
        );
        assert!(
            DomainError::PlaceholderDomain("example.com".into())
                .to_string()
                .contains("fictional or example domain")
        );
    }

    #[test]
    fn test_is_url_error() {
        assert!(DomainError::InvalidUrlScheme.is_url_error());
        assert!(DomainError::PlaceholderDomain("test.com".into()).is_url_error());
        assert!(!DomainError::UnknownCategory("Shoes".into()).is_url_error());
    }

    #[test]
    fn test_into_tool_error() {
        let err: ToolError = DomainError::InvalidUrlScheme.into();
        assert_eq!(err.kind, ToolErrorKind::Validation);

        let err: ToolError = DomainError::UnknownCategory("Pets".into()).into();
        assert_eq!(err.kind, ToolErrorKind::Validation);
        assert_eq!(err.message, "Category 'Pets' was not found in the taxonomy");

        let err: ToolError = DomainError::InvalidTaxonomy("empty".into()).into();
        assert_eq!(err.kind, ToolErrorKind::Configuration);
    }
}
