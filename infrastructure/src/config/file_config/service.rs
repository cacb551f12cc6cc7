//! `[taxonomy]`, `[server]` and `[logging]` sections

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where to read the category taxonomy from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTaxonomyConfig {
    /// Explicit taxonomy file; the candidate paths are tried when unset
    pub path: Option<PathBuf>,
}

/// HTTP API listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl FileServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Diagnostic log file (in addition to stderr)
    pub file: Option<PathBuf>,
    /// JSONL conversation transcript
    pub conversation_log: Option<PathBuf>,
}
