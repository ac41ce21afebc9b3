//! mindspace - guided breathing, meditation sessions and mood tracking
//!
//! Uses XDG Base Directory specification for file locations:
//! - Mood store: $XDG_DATA_HOME/mindspace/mood.db (~/.local/share/mindspace/mood.db)
//! - Logs: $XDG_STATE_HOME/mindspace/mindspace.YYYY-MM-DD.log (~/.local/state/mindspace/)
//! - Config: $XDG_CONFIG_HOME/mindspace/config.toml (~/.config/mindspace/config.toml)

mod breathe;
mod mood;
mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mindspace_core::breathing::catalog;
use mindspace_core::mood::{MoodStore, SqliteRepository};
use mindspace_core::Config;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mindspace")]
#[command(about = "Guided breathing, meditation sessions and mood tracking")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available breathing patterns
    Patterns {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a guided breathing exercise
    Breathe(breathe::BreatheArgs),

    /// Run a timed meditation session with optional mood check-ins
    Session(session::SessionArgs),

    /// Record and review mood ratings
    #[command(subcommand)]
    Mood(mood::MoodCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;

    // Logs go to file so they never interleave with progress output
    let _log_guard =
        mindspace_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("mindspace starting");

    match cli.command {
        Command::Patterns { json } => print_patterns(json),
        Command::Breathe(args) => breathe::run(&args, &config),
        Command::Session(args) => session::run(&args, &config),
        Command::Mood(command) => mood::run(command, &config),
    }
}

fn print_patterns(json: bool) -> Result<()> {
    let patterns = catalog();

    if json {
        let rendered =
            serde_json::to_string_pretty(&patterns).context("failed to serialize patterns")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Breathing patterns:");
    for pattern in &patterns {
        println!(
            "  {:<12} {:<22} {}",
            pattern.key.as_str(),
            pattern.name,
            pattern.summary()
        );
        println!("  {:<12} {}", "", pattern.description);
    }
    Ok(())
}

/// Open the mood store at its XDG location.
pub(crate) fn open_store() -> Result<MoodStore<SqliteRepository>> {
    let db_path = Config::database_path();
    tracing::info!(path = %db_path.display(), "Opening mood store");

    let repo = SqliteRepository::open(&db_path).context("failed to open mood store")?;
    Ok(MoodStore::new(repo))
}

/// Install a Ctrl+C handler and return the flag it clears.
pub(crate) fn interrupt_flag() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    Ok(running)
}
