//! Gita Wisdom CLI
//!
//! Main entry point for the `gita` command-line tool.
//! Answers questions with guidance and verses from a prebuilt corpus.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, StatsCommand};
use gita_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Gita Wisdom CLI - guidance and verses from the Bhagavad Gita
#[derive(Parser, Debug)]
#[command(name = "gita")]
#[command(about = "Guidance and verses from the Bhagavad Gita", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "GITA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "GITA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the prebuilt corpus (default: <workspace>/rag_base)
    #[arg(long, global = true, env = "GITA_CORPUS_DIR")]
    corpus_dir: Option<PathBuf>,

    /// Embedding provider (trigram, fastembed)
    #[arg(short, long, global = true, env = "GITA_EMBEDDING_PROVIDER")]
    embedding_provider: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the Gita a question
    Ask(AskCommand),

    /// Show corpus statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Workspace and config file decide which YAML is merged
    let mut config = AppConfig::load_from(cli.workspace, cli.config)?.with_overrides(
        None,
        None,
        cli.corpus_dir,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    if cli.embedding_provider.is_some() {
        config.embedding_provider = cli.embedding_provider;
    }

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Gita CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Corpus: {:?}", config.corpus_dir);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
