//! Directory Manager CLI
//!
//! A thin front end over the directory engine: each subcommand is marshalled
//! into a typed engine command and the outcome is rendered as a table or JSON.

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{entries, files, model};
use engine_lib::predictor::ModelSource;
use engine_lib::{Engine, EngineConfig};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// AI-powered directory management
#[derive(Parser)]
#[command(name = "dirman")]
#[command(author, version, about = "AI-powered Directory Management System", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML); defaults to the user config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model artifact path, overriding the configuration
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Registry state file, overriding the configuration
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Track a directory
    Add {
        /// Directory to add
        path: String,
    },

    /// Stop tracking a directory
    Remove {
        /// Directory to remove
        path: String,
    },

    /// Replace a tracked directory with another, keeping its position
    Update {
        /// Currently tracked directory
        old_path: String,
        /// Replacement directory
        new_path: String,
    },

    /// List tracked directories
    List,

    /// Run directory management over all tracked entries
    Run {
        /// Print Prometheus metrics after the run
        #[arg(long)]
        metrics: bool,
    },

    /// Create a file inside a directory
    CreateFile {
        /// Target directory
        directory: String,
        /// File name to create
        name: String,
        /// File content (empty when omitted)
        #[arg(long)]
        content: Option<String>,
    },

    /// Remove a file
    RemoveFile {
        /// File to remove
        path: String,
    },

    /// Inspect or retrain the AI model
    #[command(subcommand)]
    Model(ModelCommands),
}

#[derive(Subcommand)]
pub enum ModelCommands {
    /// Show the active model
    Status,

    /// Retrain on the bootstrap sample and overwrite the artifact
    Train,
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    if let Err(e) = run(cli) {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = EngineConfig::load(cli.config.as_deref())?;
    if let Some(model_path) = cli.model {
        config.model_path = model_path;
    }
    if let Some(registry_path) = cli.registry {
        config.registry_path = Some(registry_path);
    }
    debug!(?config, "Configuration loaded");

    let mut engine = Engine::new(config).context("Failed to start engine")?;
    let format = cli.format;

    match cli.command {
        // Retraining replaces the model outright, so it skips loading
        Commands::Model(ModelCommands::Train) => model::retrain(&mut engine, format),
        Commands::Model(ModelCommands::Status) => {
            let source = initialize_model(&mut engine)?;
            model::show_status(&engine, source, format)
        }
        Commands::Add { path } => entries::add_entry(ready(&mut engine)?, path, format),
        Commands::Remove { path } => entries::remove_entry(ready(&mut engine)?, path, format),
        Commands::Update { old_path, new_path } => {
            entries::update_entry(ready(&mut engine)?, old_path, new_path, format)
        }
        Commands::List => entries::list_entries(ready(&mut engine)?, format),
        Commands::Run { metrics } => entries::run(ready(&mut engine)?, metrics, format),
        Commands::CreateFile {
            directory,
            name,
            content,
        } => files::create_file(ready(&mut engine)?, directory, name, content, format),
        Commands::RemoveFile { path } => files::remove_file(ready(&mut engine)?, path, format),
    }
}

fn initialize_model(engine: &mut Engine) -> Result<ModelSource> {
    engine
        .initialize_model()
        .context("Failed to initialize AI model")
}

/// Load or bootstrap the model before handing the engine to a command
fn ready(engine: &mut Engine) -> Result<&mut Engine> {
    initialize_model(engine)?;
    Ok(engine)
}
