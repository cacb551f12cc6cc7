//! Loads the marketing category taxonomy from JSON.
//!
//! With an explicit path only that file is read. Otherwise the first
//! existing file among [`CANDIDATE_PATHS`] wins.

use andy_domain::{CategoryTaxonomy, DomainError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Searched in order when no path is configured
pub const CANDIDATE_PATHS: &[&str] = &[
    "marketing_categories.json",
    "data/marketing_categories.json",
];

#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("taxonomy file not found (tried: {})", .0.join(", "))]
    NotFound(Vec<String>),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },
}

pub struct TaxonomyLoader;

impl TaxonomyLoader {
    /// Load from `path`, or from the first candidate path that exists.
    pub fn load(path: Option<&Path>) -> Result<(CategoryTaxonomy, PathBuf), TaxonomyError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::find_candidate(Path::new("."))
                .ok_or_else(|| TaxonomyError::NotFound(Self::candidates()))?,
        };
        let taxonomy = Self::load_file(&path)?;
        info!(
            path = %path.display(),
            categories = taxonomy.categories.len(),
            nodes = taxonomy.node_count(),
            "Loaded category taxonomy"
        );
        Ok((taxonomy, path))
    }

    pub fn load_file(path: &Path) -> Result<CategoryTaxonomy, TaxonomyError> {
        let json = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TaxonomyError::NotFound(vec![path.display().to_string()])
            } else {
                TaxonomyError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        CategoryTaxonomy::from_json(&json).map_err(|source| TaxonomyError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    fn find_candidate(root: &Path) -> Option<PathBuf> {
        CANDIDATE_PATHS
            .iter()
            .map(|c| root.join(c))
            .find(|p| p.is_file())
    }

    fn candidates() -> Vec<String> {
        CANDIDATE_PATHS.iter().map(|c| c.to_string()).collect()
    }
}
