//! Response envelope shared by every REST endpoint
//!
//! All backend responses arrive wrapped as `{statusCode, message,
//! body|data}`. Which key carries the payload varies by endpoint, so the
//! fallback lives here once instead of at every call site.

use crate::error::{EchoLedgerError, Result};
use serde::Deserialize;

/// The `{statusCode, message, body|data}` wrapper used by all REST
/// responses
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Application-level status code; not guaranteed to match the HTTP
    /// status the envelope arrived with
    #[serde(rename = "statusCode", default)]
    pub status_code: u16,

    /// Human-readable outcome description
    #[serde(default)]
    pub message: String,

    /// Payload under the `body` key
    #[serde(default = "none_payload")]
    pub body: Option<T>,

    /// Payload under the `data` key
    #[serde(default = "none_payload")]
    pub data: Option<T>,
}

fn none_payload<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    /// Extract the payload, accepting either the `body` or `data` key
    ///
    /// # Examples
    ///
    /// ```
    /// use echoledger::api::envelope::Envelope;
    ///
    /// let envelope: Envelope<String> = serde_json::from_str(
    ///     r#"{"statusCode": 200, "message": "ok", "data": "payload"}"#,
    /// ).unwrap();
    /// assert_eq!(envelope.into_payload(), Some("payload".to_string()));
    /// ```
    pub fn into_payload(self) -> Option<T> {
        self.body.or(self.data)
    }

    /// Extract the payload, or fail with the envelope's own message
    ///
    /// # Errors
    ///
    /// Returns [`EchoLedgerError::Api`] carrying the envelope message when
    /// neither payload key is present.
    pub fn require_payload(self) -> Result<T> {
        let status = self.status_code;
        let message = self.message.clone();
        self.into_payload().ok_or_else(|| {
            EchoLedgerError::Api {
                status,
                message: if message.is_empty() {
                    "Response carried no payload".to_string()
                } else {
                    message
                },
            }
            .into()
        })
    }
}
