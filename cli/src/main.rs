//! Kiln CLI - runs configured string pipelines over stdin.
//!
//! ```text
//! main() -> load config -> init_tracing(level, warnings) -> run | list | check
//! ```
//!
//! Logs go to stderr so stdout carries only pipeline output. The config has to
//! be read before the subscriber exists, so anything worth reporting about the
//! load is collected first and logged once tracing is up.

mod commands;

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use kiln_config::{ConfigError, KilnConfig};

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Apply configurable string pipelines to lines of text")]
struct Cli {
    /// Config file (defaults to $KILN_CONFIG, then ~/.kiln/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform stdin line by line with the named pipeline
    Run {
        /// Pipeline name
        pipeline: String,
    },
    /// List available pipelines and their stages
    List,
    /// Build every pipeline and report the first failure
    Check,
}

fn init_tracing(config_level: Option<&str>, init_warnings: Vec<String>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_level.unwrap_or(DEFAULT_LOG_LEVEL)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(env_filter)
        .init();

    for warning in init_warnings {
        tracing::warn!("{warning}");
    }
}

fn load_config(explicit: Option<&Path>) -> Result<KilnConfig, ConfigError> {
    match explicit {
        Some(path) => KilnConfig::load_from(path),
        None => KilnConfig::load().map(Option::unwrap_or_default),
    }
}

/// Message for a config file that could not be read or parsed.
fn load_warning(err: &ConfigError) -> Option<String> {
    match err {
        ConfigError::Read { path, source } => Some(format!(
            "Failed to read config at {}: {source}",
            path.display()
        )),
        ConfigError::Parse { path, source } => Some(format!(
            "Failed to parse config at {}: {source}",
            path.display()
        )),
        ConfigError::UnknownPipeline { .. } | ConfigError::InvalidStage { .. } => None,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref());
    let init_warnings = loaded.as_ref().err().and_then(load_warning).into_iter().collect();
    init_tracing(loaded.as_ref().ok().and_then(KilnConfig::log_level), init_warnings);

    let config = loaded.context("failed to load configuration")?;
    tracing::debug!(pipelines = config.pipelines.len(), "Config loaded");

    let stdout = io::stdout().lock();
    match cli.command {
        Commands::Run { pipeline } => {
            let built = config.pipeline(&pipeline)?;
            tracing::info!(pipeline = %pipeline, stages = built.len(), "Running pipeline");
            let processed = commands::run(&built, io::stdin().lock(), BufWriter::new(stdout))?;
            tracing::info!(processed, "Done");
        }
        Commands::List => commands::list(&config, stdout)?,
        Commands::Check => commands::check(&config, stdout)?,
    }

    Ok(())
}
