//! Taxonomy domain: the marketing category tree and matching against it.
//!
//! # Overview
//!
//! The taxonomy is a static tree of demographics, interests and
//! behaviors. It is loaded once at startup and shared read-only; every
//! function here takes it by reference.
//!
//! ```text
//! Technology                      (category)
//! ├─ Consumer Electronics         (subcategory)
//! │    values: Headphones, Smartphones, ...
//! └─ Software
//!    └─ Mobile Apps               (nested subcategory)
//! ```
//!
//! - [`match_categories`] scores product text against the tree and derives
//!   [`AudienceSegment`]s from the best matches.
//! - [`explore_top_level`] / [`explore_subcategories`] list the tree for
//!   browsing.

pub mod entities;
pub mod matching;
pub mod segments;

pub use entities::{CategoryNode, CategoryTaxonomy};
pub use matching::{
    CategoryMatch, CategorySummary, MatchInput, MatchLimits, MatchOutcome, SubcategoryMatch,
    explore_subcategories, explore_top_level, match_categories,
};
pub use segments::{AudienceSegment, CriterionKind, TargetingCriterion, generate_segments};
