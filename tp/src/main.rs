//! TripPlanner - travel assistant
//!
//! CLI entry point: runs the HTTP server or answers a single query.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, error, info, warn};

use tripplanner::cli::{Cli, Command};
use tripplanner::config::Config;
use tripplanner::llm::{LlmClient, create_client};
use tripplanner::planner::Planner;
use tripplanner::prompts::PromptLoader;
use tripplanner::server::{self, AppState};
use tripplanner::tools::ItineraryTool;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    // stdout carries command output, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal; the environment may already carry the key
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    info!(provider = %config.llm.provider, model = %config.llm.model, "TripPlanner loaded config");

    let prompts = Arc::new(
        PromptLoader::new(config.prompts.expanded_dir().as_deref()).context("Failed to load prompt templates")?,
    );

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => cmd_serve(&config, prompts, None, None).await,
        Some(Command::Serve { host, port }) => cmd_serve(&config, prompts, host, port).await,
        Some(Command::Ask { query }) => cmd_ask(&config, prompts, &query).await,
        Some(Command::Plan { destination }) => cmd_plan(&config, prompts, &destination).await,
    }
}

/// Build the shared LLM client; `None` leaves the service unconfigured
fn llm_client(config: &Config) -> Option<Arc<dyn LlmClient>> {
    match create_client(&config.llm) {
        Ok(client) => Some(client),
        Err(e) if e.is_configuration() => {
            warn!(error = %e, "LLM not configured");
            None
        }
        Err(e) => {
            error!(error = %e, "Failed to create LLM client");
            None
        }
    }
}

fn app_state(config: &Config, prompts: Arc<PromptLoader>) -> AppState {
    match llm_client(config) {
        Some(llm) => AppState::configured(Arc::new(Planner::new(llm, prompts, &config.llm))),
        None => AppState::unconfigured(),
    }
}

async fn cmd_serve(config: &Config, prompts: Arc<PromptLoader>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut server_config = config.server.clone();
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    server::serve(&server_config, app_state(config, prompts)).await
}

async fn cmd_ask(config: &Config, prompts: Arc<PromptLoader>, query: &str) -> Result<()> {
    let state = app_state(config, prompts);
    match server::answer(&state, query).await {
        Ok(reply) => {
            println!("{}", serde_json::to_string_pretty(&reply)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e.body())?);
            std::process::exit(1);
        }
    }
}

async fn cmd_plan(config: &Config, prompts: Arc<PromptLoader>, destination: &str) -> Result<()> {
    let llm = create_client(&config.llm).context("LLM client unavailable")?;
    let tool = ItineraryTool::new(llm, prompts, config.llm.max_tokens);

    let outcome = tool.generate_itinerary(destination).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if outcome.is_error() {
        std::process::exit(1);
    }
    Ok(())
}
