/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `signup`  — Interactive registration flow
- `account` — Login, logout, and whoami
- `plans`   — Subscription plan listing
- `chat`    — Interactive chat with the assistant

These handlers are intentionally small and use the library components:
the API client, the flow machine, and the chat session.
*/

use crate::api::types::{AccountType, UserProfile};
use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::store::{DurableSession, FileStore};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;

pub mod account;
pub mod chat;
pub mod plans;
pub mod signup;

/// Open the durable session backed by the default on-disk store
pub(crate) fn durable_session() -> Result<DurableSession> {
    Ok(DurableSession::new(Arc::new(FileStore::open_default()?)))
}

/// Build the API client over the durable session
pub(crate) fn api_client(config: &Config, session: DurableSession) -> Result<ApiClient> {
    ApiClient::new(&config.api, session)
}

/// Read one line of input; `None` means the user cancelled (Ctrl-C/D)
pub(crate) fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read one line, re-prompting until it is non-empty
pub(crate) fn read_required(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    loop {
        match read_line(rl, prompt)? {
            Some(line) if line.is_empty() => {
                println!("{}", "A value is required.".yellow());
            }
            other => return Ok(other),
        }
    }
}

/// Print the post-authentication landing line for a profile
pub(crate) fn print_landing(user: &UserProfile) {
    let surface = match user.account_type {
        Some(AccountType::Business) => "business dashboard",
        _ => "dashboard",
    };
    println!(
        "{}",
        format!(
            "Welcome, {} {}! You are on the {}.",
            user.firstname, user.lastname, surface
        )
        .green()
    );
}
