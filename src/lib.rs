//! Echo Ledger - AI finance assistant client library
//!
//! This library provides the client-side functionality for the Echo
//! Ledger platform: the registration session flow, authenticated session
//! storage, and the synchronized chat surface.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: REST client, response envelope, and wire types
//! - `flow`: Registration step machine, its operations, and resend limits
//! - `chat`: Conversation state, REST sync driver, and the push channel
//! - `store`: Ephemeral draft and durable session key/value stores
//! - `account`: Login and logout against the durable session
//! - `config`: Configuration management and validation
//! - `error`: Error types, result alias, and the display-formatting rule
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use echoledger::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml")?;
//!     config.validate()?;
//!
//!     // Client usage would go here
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod api;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod flow;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use api::ApiClient;
pub use chat::{ChatSession, ConversationReducer, PushChannel};
pub use config::Config;
pub use error::{format_error, EchoLedgerError, Result};
pub use flow::{FlowStep, RegistrationFlow, StepEntry};
pub use store::{DurableSession, SessionDraft};
