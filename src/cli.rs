//! Command-line interface definition for the Echo Ledger client
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for signup, authentication, plan browsing, and
//! interactive chat.

use clap::{Parser, Subcommand};

/// Echo Ledger - AI finance assistant client
///
/// Register an account, log in, and converse with the assistant over
/// the synchronized chat surface.
#[derive(Parser, Debug, Clone)]
#[command(name = "echoledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Echo Ledger client
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Walk through the registration flow
    Signup,

    /// Log in with an existing account
    Login {
        /// Email address (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Clear the stored session
    Logout,

    /// Show the currently authenticated user
    Whoami,

    /// List the available subscription plans
    Plans,

    /// Start interactive chat with the assistant
    Chat {
        /// Open an existing conversation by id
        #[arg(short = 'o', long)]
        conversation: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
