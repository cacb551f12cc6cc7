//! Taxonomy file discovery and loading

mod loader;

pub use loader::{CANDIDATE_PATHS, TaxonomyError, TaxonomyLoader};
