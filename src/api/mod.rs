//! Remote API client for the Echo Ledger backend
//!
//! This module wraps every REST endpoint the client consumes behind one
//! [`ApiClient`]: authentication and OTP issuance, registration, login,
//! subscription plans, and the synchronous half of the chat protocol.
//! Responses share the `{statusCode, message, body|data}` envelope decoded
//! once in [`envelope`].

mod auth;
mod chat;
mod client;
pub mod envelope;
mod plans;
pub mod types;

pub use client::ApiClient;
pub use envelope::Envelope;
