//! Product domain: URL validation and page extraction.
//!
//! Everything here is pure. The scraping itself (HTTP, HTML parsing) is
//! done by the infrastructure layer, which hands a [`ScrapedPage`] to
//! [`extract_product`].

pub mod extraction;
pub mod url;

pub use extraction::{
    Extraction, ParsingWarning, ProductData, ScrapedPage, extract_description, extract_features,
    extract_price, extract_product, extract_specifications, extract_title,
};
pub use url::{extract_url, fallback_title, is_placeholder_host, validate_product_url};
