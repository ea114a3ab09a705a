//! CampusBuddy CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Write a default config and the sample dataset
//! - `chat`: Interactive chat or single-message mode
//! - `classify`: Show the tone scores for a piece of text
//! - `search`: Query the embedding index directly
//! - `doctor`: Diagnose configuration and dataset health

use std::path::PathBuf;

use campusbuddy_config::AppConfig;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "campusbuddy",
    about = "CampusBuddy — a tone-aware campus information assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.campusbuddy/config.toml
    #[arg(long, global = true, env = "CAMPUSBUDDY_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and the sample campus dataset
    Onboard,

    /// Chat with CampusBuddy
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Session id to use (a fresh one is generated otherwise)
        #[arg(long)]
        session: Option<String>,
    },

    /// Score the tone of a piece of text
    Classify {
        text: String,
    },

    /// Search the knowledge index
    Search {
        query: String,

        /// Maximum number of matches
        #[arg(short, long, default_value_t = 5)]
        k: usize,

        /// Minimum cosine similarity (defaults to retrieval.min_similarity)
        #[arg(long)]
        threshold: Option<f32>,

        /// Print matches as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and dataset health
    Doctor,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);

    // Onboard and doctor must run even when the config is broken.
    let config = match cli.command {
        Commands::Onboard | Commands::Doctor => None,
        _ => Some(
            AppConfig::load_with_env(&config_path)
                .map_err(|e| format!("Failed to load config: {e}"))?,
        ),
    };

    init_logging(cli.verbose, config.as_ref());

    match (cli.command, config) {
        (Commands::Onboard, _) => commands::onboard::run(&config_path)?,
        (Commands::Doctor, _) => commands::doctor::run(&config_path)?,
        (Commands::Chat { message, session }, Some(config)) => {
            commands::chat::run(&config, message, session)?
        }
        (Commands::Classify { text }, _) => commands::classify::run(&text)?,
        (
            Commands::Search {
                query,
                k,
                threshold,
                json,
            },
            Some(config),
        ) => commands::search::run(&config, &query, k, threshold, json)?,
        (_, None) => return Err("configuration was not loaded".into()),
    }

    Ok(())
}

fn init_logging(verbose: bool, config: Option<&AppConfig>) {
    let level = match (verbose, config) {
        (true, _) => "debug".to_string(),
        (false, Some(config)) => config.logging.level.clone(),
        (false, None) => "info".to_string(),
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.is_some_and(|c| c.logging.json) {
        builder.json().init();
    } else {
        builder.init();
    }
}
