//! LangFit - programming language personality quiz
//!
//! Command-line front end for the matching engine: interactive quiz,
//! seeded simulation, question inspection and share links.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use langfit_common::{ConfigResolver, LoggingConfig};
use langfit_engine::{PersonalityType, QuizEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

/// Command-line arguments for langfit
#[derive(Parser, Debug)]
#[command(name = "langfit")]
#[command(about = "Find the programming language that fits your personality")]
#[command(version)]
struct Args {
    /// Configuration file (overrides LANGFIT_CONFIG and the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL used when building share links
    #[arg(
        long,
        global = true,
        env = "LANGFIT_BASE_URL",
        default_value = "http://localhost:5173/"
    )]
    base_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take the quiz interactively (default)
    Play,

    /// Answer every question with a seeded random choice
    Simulate {
        /// RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Print the full session snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the candidate set and ranked adaptive questions for a type
    Questions {
        /// Four-letter type code, e.g. INTJ
        personality: PersonalityType,

        #[arg(long)]
        json: bool,
    },

    /// List the sixteen personality types
    Types,

    /// Encode or decode result-sharing tokens
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
}

#[derive(Subcommand, Debug)]
enum ShareAction {
    /// Build a share token and link for a result
    Encode {
        language_id: String,
        personality: PersonalityType,
    },

    /// Decode a share token or full share URL
    Decode { token: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, source) = ConfigResolver::new()
        .load(args.config.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(&config.logging)?;

    info!(
        "Starting LangFit v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Configuration source: {:?}", source);

    let engine = QuizEngine::from_config(&config)
        .context("Failed to initialize quiz engine")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command.unwrap_or(Command::Play) {
        Command::Play => {
            let stdin = io::stdin();
            commands::play(&engine, &args.base_url, stdin.lock(), &mut out)
        }
        Command::Simulate { seed, json } => {
            commands::simulate(&engine, &args.base_url, seed, json, &mut out)
        }
        Command::Questions { personality, json } => {
            commands::questions(&engine, personality, json, &mut out)
        }
        Command::Types => commands::types(&engine, &mut out),
        Command::Share { action } => match action {
            ShareAction::Encode {
                language_id,
                personality,
            } => {
                commands::share_encode(&engine, &args.base_url, &language_id, personality, &mut out)
            }
            ShareAction::Decode { token } => {
                commands::share_decode(&engine, &args.base_url, &token, &mut out)
            }
        },
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr, or to the
/// configured file without ANSI colors.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("Invalid log level '{}'", logging.level))?,
    };

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}
