//! The durable authenticated session
//!
//! Bearer credential plus user profile, persisted beyond the life of a
//! single run. Created on login or registration success; destroyed on
//! logout or by the global 401 interceptor.

use crate::api::types::{AuthResponse, UserProfile};
use crate::store::KeyValueStore;
use std::sync::Arc;

/// Durable key: bearer credential
pub const KEY_ACCESS_TOKEN: &str = "accessToken";
/// Durable key: user profile as JSON
pub const KEY_USER: &str = "user";

/// Handle to the durable session store
///
/// Cheap to clone; all clones share the same underlying store.
#[derive(Clone)]
pub struct DurableSession {
    store: Arc<dyn KeyValueStore>,
}

impl DurableSession {
    /// Create a session handle over the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored bearer credential, if any
    pub fn access_token(&self) -> Option<String> {
        self.store.get(KEY_ACCESS_TOKEN)
    }

    /// Store a bearer credential directly
    ///
    /// Prefer [`DurableSession::persist`] for a full auth response; this
    /// exists for tests and tooling that seed a token by hand.
    pub fn set_access_token(&self, token: &str) {
        self.store.set(KEY_ACCESS_TOKEN, token);
    }

    /// The stored user profile, if present and parseable
    ///
    /// A profile that fails to parse is treated as absent and logged;
    /// callers see an unauthenticated session rather than a panic.
    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = self.store.get(KEY_USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::error!("Stored user profile is malformed: {}", e);
                None
            }
        }
    }

    /// Whether both credential and profile are present
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some() && self.current_user().is_some()
    }

    /// Persist a successful auth response
    ///
    /// Normalizes the profile's type field (see [`UserProfile::normalize`])
    /// and writes the token before the profile, so a crash between the two
    /// writes leaves a token-without-profile state that is distinguishable
    /// from total failure.
    ///
    /// # Returns
    ///
    /// The normalized profile that was stored.
    pub fn persist(&self, auth: AuthResponse) -> UserProfile {
        let mut user = auth.user;
        user.normalize();

        self.store.set(KEY_ACCESS_TOKEN, &auth.access_token);
        match serde_json::to_string(&user) {
            Ok(json) => self.store.set(KEY_USER, &json),
            Err(e) => tracing::error!("Failed to serialize user profile: {}", e),
        }

        tracing::info!(
            "Persisted session for {} ({})",
            user.email,
            user.account_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "unknown type".to_string())
        );
        user
    }

    /// Delete credential and profile in one operation
    pub fn clear(&self) {
        self.store.remove_many(&[KEY_ACCESS_TOKEN, KEY_USER]);
    }
}
