//! CLI entrypoint for Audience Andy
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use andy_application::{LlmGateway, ToolExecutorPort, WorkflowOrchestrator};
use andy_domain::CategoryTaxonomy;
use andy_infrastructure::{
    AnalysisToolExecutor, ApiEndpoint, ConfigLoader, FileConfig, JsonSchemaToolConverter,
    JsonlConversationLogger, OpenAiGateway, SerpEndpoint, TaxonomyError, TaxonomyLoader,
    ToolSettings,
};
use andy_presentation::{AppState, ChatRepl, CheckReport, Cli, Command};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type LoadedTaxonomy = Result<(Arc<CategoryTaxonomy>, PathBuf), TaxonomyError>;

#[tokio::main]
async fn main() -> Result<()> {
    // Keys usually live in .env during development
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    let log_file = cli.log_file.as_ref().or(config.logging.file.as_ref());
    let _log_guard = init_logging(cli.verbose, log_file)?;

    info!("Starting Audience Andy");
    for issue in config.validate() {
        warn!(%issue, "Configuration issue");
    }

    // === Dependency Injection ===
    let taxonomy: LoadedTaxonomy = TaxonomyLoader::load(config.taxonomy.path.as_deref())
        .map(|(taxonomy, path)| (Arc::new(taxonomy), path));
    if let Err(e) = &taxonomy {
        warn!(error = %e, "Category taxonomy unavailable");
    }

    let timeout = Duration::from_secs(config.workflow.request_timeout_secs.max(1));
    let tools = Arc::new(build_tools(&config, &taxonomy, timeout)?);
    let gateway = Arc::new(build_gateway(&config, timeout)?);

    match cli.command() {
        Command::Check => {
            let report = system_check(&config, &taxonomy, tools.as_ref(), gateway.as_ref());
            println!("{}", report.format());
            if !report.is_ok() {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Chat => {
            let orchestrator = build_orchestrator(&config, gateway, tools);
            let mut repl = ChatRepl::new(orchestrator).with_progress(!cli.quiet);
            repl.run().await?;
            Ok(())
        }
        Command::Serve { host, port } => {
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            let address = server.bind_address();

            let orchestrator = build_orchestrator(&config, gateway, tools);
            let state = AppState::new(orchestrator, Arc::new(JsonSchemaToolConverter));
            if !cli.quiet {
                println!("Audience Andy API listening on http://{}", address);
            }
            andy_presentation::serve(state, &address).await?;
            Ok(())
        }
    }
}

/// Initialize logging based on verbosity level. `RUST_LOG` wins when set.
fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (directory, file_name) = split_log_path(path)?;
            std::fs::create_dir_all(&directory)
                .with_context(|| format!("Failed to create log directory {}", directory.display()))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Log file path has no file name: {}", path.display()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, PathBuf::from(file_name)))
}

fn build_tools(
    config: &FileConfig,
    taxonomy: &LoadedTaxonomy,
    timeout: Duration,
) -> Result<AnalysisToolExecutor> {
    let firecrawl = &config.providers.firecrawl;
    let serpapi = &config.providers.serpapi;
    let settings = ToolSettings {
        firecrawl: ApiEndpoint::new(
            &firecrawl.base_url,
            firecrawl.resolve_api_key(),
            &firecrawl.api_key_env,
        ),
        serpapi: SerpEndpoint {
            api: ApiEndpoint::new(
                &serpapi.base_url,
                serpapi.resolve_api_key(),
                &serpapi.api_key_env,
            ),
            location: serpapi.location.clone(),
        },
        request_timeout: timeout,
    };

    let taxonomy = taxonomy
        .as_ref()
        .map(|(taxonomy, _)| Arc::clone(taxonomy))
        .map_err(|e| e.to_string());

    AnalysisToolExecutor::new(settings, taxonomy).context("Failed to create HTTP client")
}

fn build_gateway(config: &FileConfig, timeout: Duration) -> Result<OpenAiGateway> {
    let openai = &config.providers.openai;
    OpenAiGateway::new(
        &openai.base_url,
        openai.resolve_api_key(),
        &openai.api_key_env,
        &openai.model,
        timeout,
    )
    .context("Failed to create language model client")
}

fn build_orchestrator(
    config: &FileConfig,
    gateway: Arc<OpenAiGateway>,
    tools: Arc<AnalysisToolExecutor>,
) -> WorkflowOrchestrator {
    let orchestrator = WorkflowOrchestrator::new(gateway, tools, config.workflow_params());

    match &config.logging.conversation_log {
        Some(path) => match JsonlConversationLogger::open(path) {
            Ok(logger) => {
                info!(path = %path.display(), "Writing conversation transcript");
                orchestrator.with_conversation_logger(Arc::new(logger))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Conversation transcript disabled");
                orchestrator
            }
        },
        None => orchestrator,
    }
}

fn system_check(
    config: &FileConfig,
    taxonomy: &LoadedTaxonomy,
    tools: &dyn ToolExecutorPort,
    gateway: &dyn LlmGateway,
) -> CheckReport {
    let mut report = CheckReport::new();
    let providers = &config.providers;

    let keys = [
        (&providers.openai.api_key_env, providers.openai.resolve_api_key()),
        (&providers.firecrawl.api_key_env, providers.firecrawl.resolve_api_key()),
        (&providers.serpapi.api_key_env, providers.serpapi.resolve_api_key()),
    ];
    for (name, key) in keys {
        match key {
            Some(_) => report.pass(name.as_str(), "set"),
            None => report.fail(name.as_str(), "not set (export it or add it to .env)"),
        }
    }

    match taxonomy {
        Ok((taxonomy, path)) => report.pass(
            "taxonomy",
            format!(
                "{} ({} categories, {} nodes)",
                path.display(),
                taxonomy.categories.len(),
                taxonomy.node_count()
            ),
        ),
        Err(e) => report.fail("taxonomy", e.to_string()),
    }

    for entry in tools.availability() {
        let detail = entry.reason.unwrap_or_else(|| "ready".to_string());
        report.record(entry.tool.as_str(), entry.available, detail);
    }

    match gateway.check_available() {
        Ok(()) => report.pass("language model", gateway.model()),
        Err(e) => report.fail("language model", e.to_string()),
    }

    report
}
