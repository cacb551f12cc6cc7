//! Configuration file loading for audience-andy
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables `ANDY_*` (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./andy.toml` or `./.andy.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/audience-andy/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileFirecrawlConfig, FileLoggingConfig, FileOpenAiConfig,
    FileProvidersConfig, FileSerpApiConfig, FileServerConfig, FileTaxonomyConfig,
    FileWorkflowConfig,
};
pub use loader::ConfigLoader;
