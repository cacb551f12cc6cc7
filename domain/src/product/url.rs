//! Product URL detection and validation.

use crate::core::error::DomainError;
use crate::core::string::title_case;
use url::Url;

/// Hosts that are never real product pages. Subdomains match too.
pub const PLACEHOLDER_HOSTS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "exampleheadphones.com",
    "domain.com",
    "test.com",
];

/// Host fragments that mark a made-up URL.
pub const PLACEHOLDER_MARKERS: &[&str] = &["placeholder", "sample"];

const TRIM_LEADING: &[char] = &['<', '(', '[', '"', '\''];
const TRIM_TRAILING: &[char] = &['>', ')', ']', '"', '\'', '.', ',', ';', ':', '!', '?'];

/// Find the first whitespace-separated token that is an http(s) URL with a host.
///
/// Surrounding brackets, quotes and sentence punctuation are stripped.
/// Bare words such as "https" or "httpserver" are not URLs.
pub fn extract_url(text: &str) -> Option<&str> {
    text.split_whitespace()
        .map(|word| {
            word.trim_start_matches(TRIM_LEADING)
                .trim_end_matches(TRIM_TRAILING)
        })
        .find(|word| is_http_url(word))
}

fn has_http_scheme(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn is_http_url(word: &str) -> bool {
    has_http_scheme(word)
        && Url::parse(word)
            .ok()
            .and_then(|url| url.host_str().map(|h| !h.is_empty()))
            .unwrap_or(false)
}

/// Whether `host` is a documentation/placeholder domain.
pub fn is_placeholder_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    PLACEHOLDER_HOSTS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
        || PLACEHOLDER_MARKERS.iter().any(|m| host.contains(m))
}

/// Validate a URL for scraping.
///
/// Checks run in order: scheme prefix, parse, placeholder host.
pub fn validate_product_url(raw: &str) -> Result<Url, DomainError> {
    let trimmed = raw.trim();
    if !has_http_scheme(trimmed) {
        return Err(DomainError::InvalidUrlScheme);
    }

    let url = Url::parse(trimmed).map_err(|e| DomainError::MalformedUrl(e.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| DomainError::MalformedUrl("URL has no host".to_string()))?;

    if is_placeholder_host(host) {
        return Err(DomainError::PlaceholderDomain(host.to_string()));
    }

    Ok(url)
}

/// Derive a readable product name from a URL when the page gave none.
///
/// Uses the last non-empty path segment (`/p/blue-running-shoes` →
/// "Blue Running Shoes"), then the host, then "Unknown Product".
pub fn fallback_title(raw: &str) -> String {
    let Ok(url) = Url::parse(raw.trim()) else {
        return "Unknown Product".to_string();
    };

    let segment = url
        .path_segments()
        .and_then(|segments| segments.rev().find(|s| !s.is_empty()))
        .map(|s| s.split('.').next().unwrap_or(s))
        .map(|s| s.replace(['-', '_', '+'], " "))
        .filter(|s| s.chars().any(|c| c.is_alphabetic()));

    match segment {
        Some(s) => title_case(&s),
        None => url
            .host_str()
            .map(|h| h.trim_start_matches("www.").to_string())
            .unwrap_or_else(|| "Unknown Product".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_url_from_message() {
        assert_eq!(
            extract_url("please analyze https://shop.acme.io/p/123 thanks"),
            Some("https://shop.acme.io/p/123")
        );
        assert_eq!(
            extract_url("look at (https://acme.io/item)."),
            Some("https://acme.io/item")
        );
        assert_eq!(extract_url("HTTP://ACME.IO"), Some("HTTP://ACME.IO"));
        assert_eq!(extract_url("no link here"), None);
        assert_eq!(extract_url("http"), None);
    }

    #[test]
    fn test_extract_url_ignores_bare_scheme_words() {
        assert_eq!(extract_url("Does your site support https?"), None);
        assert_eq!(extract_url("my httpserver product"), None);
        assert_eq!(extract_url("HTTPS only, please"), None);
        assert_eq!(extract_url("try http:// later"), None);
        assert_eq!(extract_url("httpbin.org is down"), None);
        assert_eq!(
            extract_url("https is fine, see https://acme.io/docs"),
            Some("https://acme.io/docs")
        );
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        let inputs = [
            "ftp://acme.io/file",
            "acme.io/product",
            "www.acme.io",
            "file:///etc/passwd",
            "mailto:sales@acme.io",
            "javascript:alert(1)",
            "",
            "   ",
            "htp://acme.io",
            "//acme.io/item",
        ];
        for input in inputs {
            assert_eq!(
                validate_product_url(input),
                Err(DomainError::InvalidUrlScheme),
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn test_placeholder_hosts_rejected() {
        let inputs = [
            "https://example.com/product",
            "http://www.example.com",
            "https://shop.example.org/x",
            "https://exampleheadphones.com/buy",
            "https://domain.com",
            "https://test.com/item?id=1",
            "https://placeholder-store.io/p",
            "https://sample.shop/p",
        ];
        for input in inputs {
            assert!(
                matches!(
                    validate_product_url(input),
                    Err(DomainError::PlaceholderDomain(_))
                ),
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn test_lookalike_hosts_allowed() {
        assert!(validate_product_url("https://myexample.com/item").is_ok());
        assert!(validate_product_url("https://contest.com/prize").is_ok());
        assert!(validate_product_url("HTTPS://Shop.Acme.io/p/1").is_ok());
    }

    #[test]
    fn test_malformed_url() {
        assert!(matches!(
            validate_product_url("https://"),
            Err(DomainError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(
            fallback_title("https://shop.acme.io/p/blue-running_shoes.html"),
            "Blue Running Shoes"
        );
        assert_eq!(fallback_title("https://www.acme.io/"), "acme.io");
        assert_eq!(fallback_title("https://acme.io/p/12345"), "acme.io");
        assert_eq!(fallback_title("not a url"), "Unknown Product");
    }
}
