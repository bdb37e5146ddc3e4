use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use palaver_core::{Config, logging};
use palaver_providers::ProviderFactory;
use palaver_store::{HistoryStore, MemoryHistoryStore, SqliteHistoryStore};
use palaver_ui::{App, SessionController};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// palaver - chat with an OpenAI-compatible model from the terminal
#[derive(Parser, Debug)]
#[command(name = "palaver")]
#[command(about = "A terminal chat client with searchable prompt history", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// System prompt placed before the first message
    #[arg(short, long, value_name = "TEXT")]
    system: Option<String>,

    /// Path to palaver.toml (default: ./palaver.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep history in memory for this session only
    #[arg(long)]
    no_history: bool,

    /// Verbose output and debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(|| PathBuf::from(palaver_core::config::DEFAULT_CONFIG_FILE));
    let config = load_or_create_config(&config_path)?;

    let mut logging_config = logging::LoggingConfig::from(config.logging.clone());
    if cli.verbose {
        logging_config = logging_config.with_level("debug");
    }
    let _log_guard = logging::init_logging(Some(logging_config)).context("Failed to initialize logging")?;

    if cli.verbose {
        println!("{} Using config: {}", "Info:".blue().bold(), config_path.display());
        println!("{} Provider: {}", "Info:".blue().bold(), config.provider.name().cyan());
    }

    let completions = ProviderFactory::create_from_config(&config.provider).context("Failed to create provider")?;
    let history = open_history(&config, cli.no_history, cli.verbose).await?;

    let controller = SessionController::new(completions, history)
        .with_system_prompt(cli.system)
        .with_completion_timeout(config.provider.timeout());

    let mut app = App::new(controller);
    app.run().await.context("Terminal session failed")?;

    Ok(())
}

/// Load config from file or create from example
fn load_or_create_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        println!("{} Config not found at {}", "Warning:".yellow().bold(), path.display());
        println!("{} Creating config from example...", "Info:".blue().bold());

        std::fs::write(path, Config::example()).context("Failed to create config")?;

        println!(
            "{} Created config at {}. Add your API key and model, then run again.",
            "Success:".green().bold(),
            path.display()
        );

        anyhow::bail!("Please edit {} with your settings and run again", path.display())
    }
}

/// Open the on-disk store, or a session-local one when history is off
async fn open_history(config: &Config, no_history: bool, verbose: bool) -> Result<Arc<dyn HistoryStore>> {
    if no_history || !config.history.enabled {
        tracing::info!("history persistence disabled");
        return Ok(Arc::new(MemoryHistoryStore::new()));
    }

    let db_path = config.history.resolved_db_path().context("Failed to resolve history path")?;
    if verbose {
        println!("{} History: {}", "Info:".blue().bold(), db_path.display());
    }

    let store = SqliteHistoryStore::open(&db_path)
        .await
        .with_context(|| format!("Failed to open history database {}", db_path.display()))?;
    Ok(Arc::new(store))
}
