//! Push channel for server-initiated chat events
//!
//! A WebSocket connection scoped to one authenticated user. The server
//! pushes `new_message` and `ai_typing` events; the client never sends
//! application frames on this channel (prompts travel over REST). Frames
//! are decoded on a background task and surfaced through an unbounded
//! queue so slow consumers never stall the socket read loop.

use crate::api::types::Role;
use crate::config::SocketConfig;
use crate::error::{EchoLedgerError, Result};
use futures::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// A server-pushed event, decoded from a `{"event": ..., "data": ...}`
/// text frame
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum SocketEvent {
    /// A message appended to one of the user's conversations
    NewMessage {
        role: Role,
        content: String,
        #[serde(rename = "conversationId")]
        conversation_id: String,
    },
    /// The assistant started or stopped composing in a conversation
    AiTyping {
        #[serde(rename = "isTyping")]
        is_typing: bool,
        #[serde(rename = "conversationId")]
        conversation_id: String,
    },
}

/// Live push connection for one user
///
/// Dropping the channel aborts the background read task and closes the
/// connection.
#[derive(Debug)]
pub struct PushChannel {
    events: mpsc::UnboundedReceiver<SocketEvent>,
    reader: JoinHandle<()>,
}

impl PushChannel {
    /// Connect and authenticate the push channel
    ///
    /// The bearer token and user id ride as query parameters; the server
    /// scopes the connection to that user's conversations. Connection
    /// establishment is bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`EchoLedgerError::Socket`] when the URL is invalid, the
    /// handshake fails, or the timeout elapses.
    pub async fn connect(config: &SocketConfig, token: &str, user_id: &str) -> Result<Self> {
        let mut url = Url::parse(&config.url)
            .map_err(|e| EchoLedgerError::Socket(format!("Invalid socket URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("token", token)
            .append_pair("userId", user_id);

        let timeout = Duration::from_secs(config.connect_timeout_seconds);
        let handshake = tokio_tungstenite::connect_async(url.as_str());
        let (stream, _) = tokio::time::timeout(timeout, handshake)
            .await
            .map_err(|_| {
                EchoLedgerError::Socket(format!(
                    "Connection timed out after {}s",
                    config.connect_timeout_seconds
                ))
            })?
            .map_err(|e| EchoLedgerError::Socket(format!("Connection failed: {}", e)))?;

        tracing::info!("Push channel connected for user {}", user_id);

        let (_, mut read) = stream.split();
        let (tx, events) = mpsc::unbounded_channel();
        let reader = tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<SocketEvent>(&text) {
                        Ok(event) => {
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::debug!("Ignoring unrecognized push frame: {}", e);
                        }
                    },
                    Ok(Message::Close(_)) => {
                        tracing::info!("Push channel closed by server");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("Push channel read error: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(Self { events, reader })
    }

    /// Wait for the next pushed event; `None` once the connection is gone
    pub async fn next_event(&mut self) -> Option<SocketEvent> {
        self.events.recv().await
    }

    /// Take an already-queued event without waiting
    pub fn try_next_event(&mut self) -> Option<SocketEvent> {
        self.events.try_recv().ok()
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_frame_decodes() {
        let frame = r#"{
            "event": "new_message",
            "data": {"role": "assistant", "content": "hi", "conversationId": "conv-1"}
        }"#;
        let event: SocketEvent = serde_json::from_str(frame).unwrap();
        assert_eq!(
            event,
            SocketEvent::NewMessage {
                role: Role::Assistant,
                content: "hi".to_string(),
                conversation_id: "conv-1".to_string(),
            }
        );
    }

    #[test]
    fn test_ai_typing_frame_decodes() {
        let frame = r#"{
            "event": "ai_typing",
            "data": {"isTyping": true, "conversationId": "conv-1"}
        }"#;
        let event: SocketEvent = serde_json::from_str(frame).unwrap();
        assert_eq!(
            event,
            SocketEvent::AiTyping {
                is_typing: true,
                conversation_id: "conv-1".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_event_fails_decode() {
        let frame = r#"{"event": "billing_update", "data": {}}"#;
        assert!(serde_json::from_str::<SocketEvent>(frame).is_err());
    }
}
