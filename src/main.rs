//! Echo Ledger - AI finance assistant client
//!
#![doc = "Echo Ledger - AI finance assistant client"]
#![doc = "Main entry point for the Echo Ledger CLI."]

use anyhow::Result;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use echoledger::cli::{Cli, Commands};
use echoledger::commands;
use echoledger::config::Config;
use echoledger::error::format_error;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    let outcome = match cli.command {
        Commands::Signup => {
            tracing::info!("Starting registration flow");
            commands::signup::run(config).await
        }
        Commands::Login { email } => {
            tracing::info!("Starting login");
            commands::account::run_login(config, email).await
        }
        Commands::Logout => commands::account::run_logout(),
        Commands::Whoami => commands::account::run_whoami(),
        Commands::Plans => {
            tracing::info!("Fetching subscription plans");
            commands::plans::run(config).await
        }
        Commands::Chat { conversation } => {
            tracing::info!("Starting interactive chat");
            commands::chat::run(config, conversation).await
        }
    };

    // One display rule for every surfaced failure
    if let Err(e) = outcome {
        eprintln!("{}", format_error(&e).red());
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "echoledger=debug"
    } else {
        "echoledger=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
