//! Error types for the Echo Ledger client
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling, plus the single
//! error-formatting rule applied to anything shown to the user.

use thiserror::Error;

/// Main error type for Echo Ledger client operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, API calls, session storage, push-channel
/// handling, and client-side validation.
#[derive(Error, Debug)]
pub enum EchoLedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Expected domain errors: the backend returned a structured envelope
    /// with a failure message
    #[error("{message}")]
    Api {
        /// HTTP status the envelope arrived with
        status: u16,
        /// Backend-provided message
        message: String,
    },

    /// The backend rejected the bearer credential; the durable session
    /// has been cleared by the time this is returned
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// Client-side validation errors, caught before submission
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session storage errors (draft or durable)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Push-channel errors (connect, handshake, decode)
    #[error("Push channel error: {0}")]
    Socket(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Echo Ledger client operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

/// Fallback message used when an error carries nothing displayable
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Formats any flow or chat error into a user-displayable message
///
/// Every step of the registration flow and every chat operation surfaces
/// failures through this one rule: prefer the backend-provided envelope
/// message, then the error's own display text, then a generic fallback.
///
/// # Arguments
///
/// * `err` - The error to format
///
/// # Examples
///
/// ```
/// use echoledger::error::{format_error, EchoLedgerError};
///
/// let err = anyhow::Error::new(EchoLedgerError::Api {
///     status: 400,
///     message: "Invalid or expired OTP".to_string(),
/// });
/// assert_eq!(format_error(&err), "Invalid or expired OTP");
/// ```
pub fn format_error(err: &anyhow::Error) -> String {
    if let Some(EchoLedgerError::Api { message, .. }) = err.downcast_ref::<EchoLedgerError>() {
        if !message.is_empty() {
            return message.clone();
        }
    }

    let display = err.to_string();
    if !display.is_empty() {
        return display;
    }

    GENERIC_ERROR_MESSAGE.to_string()
}
