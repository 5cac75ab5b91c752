//! signet CLI
//!
//! - Derive the scopes a set of clients asks for
//! - Manage the configuration file
//! - Run scripted sign-in simulations against the orchestrator

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use signet::commands;

#[derive(Parser)]
#[command(name = "signet")]
#[command(author, version, about = "Sequential sign-in orchestration for remote service clients")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the scopes requested for a set of clients
    Scopes {
        /// Client names: games, social (or plus), app_state
        #[arg(required = true)]
        clients: Vec<String>,
    },

    /// Run the scripted sign-in simulation from the configuration
    Simulate {
        /// Requested clients, e.g. "games|app_state" (overrides config)
        #[arg(long)]
        clients: Option<String>,
        /// Initial automatic sign-in mode (overrides config)
        #[arg(long)]
        auto_sign_in: Option<bool>,
        /// Print the transcript and final status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Show current configuration
    Show,
    /// Show config file path
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Scopes { clients } => commands::scopes_command(&clients),
        Commands::Simulate {
            clients,
            auto_sign_in,
            json,
        } => commands::simulate_command(
            cli.config.as_ref(),
            clients.as_deref(),
            auto_sign_in,
            json,
        ),
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => commands::config_init(cli.config.as_ref(), force),
            ConfigAction::Show => commands::config_show(cli.config.as_ref()),
            ConfigAction::Path => commands::config_path(cli.config.as_ref()),
        },
    }
}
