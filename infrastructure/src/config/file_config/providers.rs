//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Resolve an API key: the explicit `api_key` wins, then the named
/// environment variable. Blank values count as unset.
fn resolve_key(api_key: &Option<String>, api_key_env: &str) -> Option<String> {
    api_key
        .clone()
        .or_else(|| std::env::var(api_key_env).ok())
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use env var instead).
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API (can be overridden for compatible servers).
    pub base_url: String,
    /// Chat completion model.
    pub model: String,
    /// Max tokens for the recommendation call.
    pub max_tokens: u32,
    /// Max tokens for follow-up answers.
    pub reply_max_tokens: u32,
    pub temperature: f32,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4-turbo".to_string(),
            max_tokens: 1500,
            reply_max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

impl FileOpenAiConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(&self.api_key, &self.api_key_env)
    }
}

/// Firecrawl scraping API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFirecrawlConfig {
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for FileFirecrawlConfig {
    fn default() -> Self {
        Self {
            api_key_env: "FIRECRAWL_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.firecrawl.dev".to_string(),
        }
    }
}

impl FileFirecrawlConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(&self.api_key, &self.api_key_env)
    }
}

/// SerpAPI search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSerpApiConfig {
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    /// Location sent with every search.
    pub location: String,
}

impl Default for FileSerpApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "SERPAPI_KEY".to_string(),
            api_key: None,
            base_url: "https://serpapi.com".to_string(),
            location: "United States".to_string(),
        }
    }
}

impl FileSerpApiConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(&self.api_key, &self.api_key_env)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// OpenAI chat completion settings.
    pub openai: FileOpenAiConfig,
    /// Firecrawl scraping settings.
    pub firecrawl: FileFirecrawlConfig,
    /// SerpAPI search settings.
    pub serpapi: FileSerpApiConfig,
}
