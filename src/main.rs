//! Mathesis - Emotion-Aware Personalized Learning Platform
//!
//! This is the main entry point for the mathesis CLI, which manages the
//! learning database, seeds the demo catalog, serves the HTTP API, and
//! runs learning analytics over stored emotion streams.

mod cli;

use clap::{Parser, Subcommand};
use mathesis_core::error::Result;
use tracing::{debug, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "mathesis")]
#[command(about = "Emotion-aware personalized learning platform", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Database path (overrides MATHESIS_DB_PATH env var and default)
    #[arg(long)]
    db_path: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init {
        /// Database path
        #[arg(short, long)]
        database: Option<String>,

        /// Seed the demo catalog after initializing
        #[arg(long)]
        seed: bool,
    },

    /// Seed the demo course catalog (replaces catalog, keeps accounts)
    Seed,

    /// Start the HTTP API server
    Serve {
        /// Server address [default: from config, 127.0.0.1:3000]
        #[arg(long)]
        addr: Option<String>,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: cli::user::UserAction,
    },

    /// Analyze a user's learning history
    Analyze {
        /// User id to analyze
        #[arg(short, long)]
        user: i64,

        /// Session duration in minutes (accepted for compatibility)
        #[arg(long, default_value = "30")]
        duration_minutes: u32,

        /// Output format (text/json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Use the specified level for our own crates, WARN for noisy dependencies
    let level_str = level.as_str().to_lowercase();
    let filter = EnvFilter::new(format!(
        "mathesis={},mathesis_core={},tower_http=warn,hyper=warn",
        level_str, level_str
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Mathesis v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Init { database, seed } => cli::init::handle(database, cli.db_path, seed).await,
        Commands::Seed => cli::seed::handle(cli.db_path).await,
        Commands::Serve { addr } => cli::serve::handle(addr, cli.db_path).await,
        Commands::User { action } => cli::user::handle(action, cli.db_path).await,
        Commands::Analyze {
            user,
            duration_minutes,
            format,
        } => cli::analyze::handle(user, duration_minutes, format, cli.db_path).await,
    }
}
