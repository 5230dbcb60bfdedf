//! Login and logout against the durable session
//!
//! Registration establishes a session through the flow module; these are
//! the returning-user equivalents.

use crate::api::types::UserProfile;
use crate::api::ApiClient;
use crate::error::{EchoLedgerError, Result};
use crate::store::DurableSession;
use crate::validate::validate_email;

/// Authenticate with email and password and persist the session
///
/// Wrong-credential responses arrive as structured envelopes (the
/// backend uses both 400 and 401 for them) and surface as
/// [`EchoLedgerError::Api`] carrying the backend's message.
pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<UserProfile> {
    let email = email.trim();
    if !validate_email(email) {
        return Err(
            EchoLedgerError::Validation("Please enter a valid email address".to_string()).into(),
        );
    }
    if password.is_empty() {
        return Err(EchoLedgerError::Validation("Password is required".to_string()).into());
    }

    let envelope = api.login(email, password).await?;
    let status = envelope.status_code;
    let message = envelope.message.clone();
    let auth = envelope.into_payload().ok_or(EchoLedgerError::Api {
        status,
        message: if message.is_empty() {
            "Invalid response from server: missing access token".to_string()
        } else {
            message
        },
    })?;
    if auth.access_token.is_empty() {
        return Err(EchoLedgerError::Api {
            status,
            message: "Invalid response from server: missing access token".to_string(),
        }
        .into());
    }

    let user = api.session().persist(auth);
    tracing::info!("Logged in as {}", user.email);
    Ok(user)
}

/// Destroy the durable session
pub fn logout(session: &DurableSession) {
    session.clear();
    tracing::info!("Session cleared");
}
