//! HTTP client for the Echo Ledger REST API
//!
//! One `ApiClient` wraps a reqwest client and owns the two cross-cutting
//! behaviors every endpoint shares: bearer-token injection from the
//! durable session, and global 401 interception that clears that session.
//! Endpoint wrappers live in the sibling modules and go through
//! [`ApiClient::post_json`] / [`ApiClient::get_json`].

use crate::api::envelope::Envelope;
use crate::config::ApiConfig;
use crate::error::{EchoLedgerError, Result};
use crate::store::DurableSession;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// REST client with auth-token injection and 401 handling
///
/// Cheap to clone; the underlying reqwest client and session handle are
/// reference counted.
///
/// # Examples
///
/// ```no_run
/// use echoledger::api::ApiClient;
/// use echoledger::config::ApiConfig;
/// use echoledger::store::{DurableSession, MemoryStore};
/// use std::sync::Arc;
///
/// # fn example() -> echoledger::error::Result<()> {
/// let session = DurableSession::new(Arc::new(MemoryStore::new()));
/// let client = ApiClient::new(&ApiConfig::default(), session)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: DurableSession,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    ///
    /// * `config` - API endpoint and timeout settings
    /// * `session` - Durable session; supplies the bearer token and is
    ///   cleared when the backend answers 401
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &ApiConfig, session: DurableSession) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("echoledger/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EchoLedgerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized API client: base_url={}", config.base_url);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// The durable session this client injects tokens from
    pub fn session(&self) -> &DurableSession {
        &self.session
    }

    /// Issue a POST with a JSON body and decode the response envelope
    ///
    /// # Arguments
    ///
    /// * `path` - Endpoint path relative to the base URL
    /// * `body` - JSON request body
    /// * `accepted_errors` - Error statuses whose bodies are still valid
    ///   structured envelopes for this endpoint (e.g. 400 for OTP
    ///   verification) rather than failures
    pub(crate) async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        accepted_errors: &[StatusCode],
    ) -> Result<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, Some(serde_json::to_value(body)?), accepted_errors)
            .await
    }

    /// Issue a GET and decode the response envelope
    pub(crate) async fn get_json<T>(
        &self,
        path: &str,
        accepted_errors: &[StatusCode],
    ) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        self.execute(Method::GET, path, None, accepted_errors).await
    }

    async fn execute<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        accepted_errors: &[StatusCode],
    ) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("API request: {} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = self.session.access_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(EchoLedgerError::Http)?;
        let status = response.status();
        let text = response.text().await.map_err(EchoLedgerError::Http)?;

        tracing::debug!("API response: {} {} -> {}", method, url, status);

        // Global 401 interception: the credential is gone either way, so
        // the durable session is cleared before the caller sees anything.
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Received 401 from {}, clearing durable session", url);
            self.session.clear();
            if !accepted_errors.contains(&status) {
                return Err(EchoLedgerError::Unauthorized.into());
            }
        }

        if status.is_success() || accepted_errors.contains(&status) {
            let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
                EchoLedgerError::Api {
                    status: status.as_u16(),
                    message: format!("Malformed response from {}: {}", url, e),
                }
            })?;
            return Ok(envelope);
        }

        // Unexpected error status: surface the envelope message when the
        // body carries one, otherwise a terse status line.
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(&text)
            .ok()
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        Err(EchoLedgerError::Api {
            status: status.as_u16(),
            message,
        }
        .into())
    }
}
