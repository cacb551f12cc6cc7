//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for audience-andy
#[derive(Parser, Debug)]
#[command(name = "audience-andy")]
#[command(author, version, about = "Audience Andy - Product audience research assistant")]
#[command(long_about = r#"
Audience Andy analyzes a product page and suggests who to market it to.

Paste a product URL and the assistant runs four steps:
1. Scraping: product details are extracted from the page (Firecrawl)
2. Research: competitors and keywords come from Google results (SerpAPI)
3. Categorizing: the product is mapped onto the marketing taxonomy
4. Summarizing: a language model writes targeting recommendations

Configuration files are loaded from (in priority order):
1. ANDY_* environment variables
2. --config <path>     Explicit config file
3. ./andy.toml         Project-level config
4. ~/.config/audience-andy/config.toml   Global config

API keys are read from OPENAI_API_KEY, FIRECRAWL_API_KEY and SERPAPI_KEY
(a .env file in the working directory is loaded at startup).

Example:
  audience-andy
  audience-andy serve --port 8000
  audience-andy check
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive chat (default)
    Chat,

    /// Serve the HTTP API
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Check API keys, the taxonomy file and tool availability
    Check,
}

impl Cli {
    /// Subcommand to run, defaulting to chat
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_chat() {
        let cli = Cli::try_parse_from(["audience-andy"]).unwrap();
        assert_eq!(cli.command(), Command::Chat);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_serve_overrides() {
        let cli =
            Cli::try_parse_from(["audience-andy", "serve", "--port", "9000", "-vv"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Serve {
                host: None,
                port: Some(9000)
            }
        );
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["audience-andy", "check", "--config", "andy.toml"]).unwrap();
        assert_eq!(cli.command(), Command::Check);
        assert_eq!(cli.config, Some(PathBuf::from("andy.toml")));
    }
}
