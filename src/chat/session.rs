//! Chat session driver
//!
//! [`ChatSession`] owns one [`ConversationReducer`] and carries out its
//! effects against the REST API: submitting prompts, fetching histories,
//! and keeping the thread list current. Push events are fed in by the
//! caller, which owns the push channel.

use crate::api::types::{ChatMessage, ConversationSummary};
use crate::api::ApiClient;
use crate::chat::reducer::{ChatEvent, ConversationReducer, Effect, EMPTY_REPLY_MESSAGE};
use crate::chat::socket::SocketEvent;
use crate::error::Result;
use std::collections::VecDeque;

/// One user's chat surface: the open conversation plus the thread list
pub struct ChatSession {
    api: ApiClient,
    reducer: ConversationReducer,
    conversations: Vec<ConversationSummary>,
}

impl ChatSession {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            reducer: ConversationReducer::new(),
            conversations: Vec::new(),
        }
    }

    /// The open conversation's transcript
    pub fn messages(&self) -> &[ChatMessage] {
        self.reducer.messages()
    }

    /// The open conversation's id, once known
    pub fn conversation_id(&self) -> Option<&str> {
        self.reducer.conversation_id()
    }

    /// The cached thread list, as of the last refresh
    pub fn conversations(&self) -> &[ConversationSummary] {
        &self.conversations
    }

    /// Submit prompt text and wait for the reply
    ///
    /// Network and envelope failures do not propagate: they land in the
    /// transcript as an error line, matching what the user would see.
    /// Only the unauthorized case bubbles up, because the session is gone.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        let effects = self.reducer.apply(ChatEvent::Submitted {
            text: text.to_string(),
        });
        self.run_effects(effects).await
    }

    /// Open a thread, replacing the transcript with its full history
    pub async fn open(&mut self, conversation_id: &str) -> Result<()> {
        let envelope = self.api.message_history(conversation_id).await?;
        if let Some(messages) = envelope.into_payload() {
            self.reducer.apply(ChatEvent::Opened {
                conversation_id: conversation_id.to_string(),
                messages,
            });
        }
        Ok(())
    }

    /// Start a fresh thread
    pub fn new_chat(&mut self) {
        self.reducer.apply(ChatEvent::NewChat);
    }

    /// Re-fetch the thread list
    pub async fn refresh_conversations(&mut self) -> Result<&[ConversationSummary]> {
        let envelope = self.api.list_conversations().await?;
        if let Some(conversations) = envelope.into_payload() {
            self.conversations = conversations;
        }
        Ok(&self.conversations)
    }

    /// Feed one push-channel event through the reducer
    ///
    /// Typing indicators carry no transcript content and are ignored
    /// here; drivers that render them read the event before forwarding.
    pub fn handle_push(&mut self, event: SocketEvent) {
        if let SocketEvent::NewMessage {
            role,
            content,
            conversation_id,
        } = event
        {
            self.reducer.apply(ChatEvent::Pushed {
                conversation_id,
                message: ChatMessage { role, content },
            });
        }
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) -> Result<()> {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::SendPrompt {
                    prompt,
                    conversation_id,
                } => {
                    let outcome = self
                        .api
                        .send_prompt(&prompt, conversation_id.as_deref())
                        .await;
                    let follow_up = match outcome {
                        Ok(envelope) => match envelope.into_payload() {
                            Some(reply) => self.reducer.apply(ChatEvent::SendSucceeded {
                                conversation_id: reply.conversation_id,
                                reply: reply.response,
                            }),
                            None => self.reducer.apply(ChatEvent::SendSucceeded {
                                conversation_id: None,
                                reply: EMPTY_REPLY_MESSAGE.to_string(),
                            }),
                        },
                        Err(e) => {
                            if e.downcast_ref::<crate::error::EchoLedgerError>().is_some_and(
                                |err| matches!(err, crate::error::EchoLedgerError::Unauthorized),
                            ) {
                                return Err(e);
                            }
                            tracing::error!("Prompt send failed: {}", e);
                            self.reducer.apply(ChatEvent::SendFailed)
                        }
                    };
                    queue.extend(follow_up);
                }
                Effect::RefreshConversations => {
                    if let Err(e) = self.refresh_conversations().await {
                        tracing::error!("Conversation list refresh failed: {}", e);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Role;
    use crate::config::ApiConfig;
    use crate::store::{DurableSession, MemoryStore};
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_for(server: &MockServer) -> ChatSession {
        let config = ApiConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
        };
        let store = DurableSession::new(Arc::new(MemoryStore::new()));
        ChatSession::new(ApiClient::new(&config, store).unwrap())
    }

    #[tokio::test]
    async fn test_send_records_exchange_and_adopts_thread() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prompt/send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "statusCode": 200,
                "message": "ok",
                "body": {"conversationId": "conv-1", "response": "hi"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/prompt/conversations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "statusCode": 200,
                "message": "ok",
                "body": [{"id": "conv-1", "title": "New thread"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = session_for(&server);
        session.send("hello").await.unwrap();

        assert_eq!(session.conversation_id(), Some("conv-1"));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].role, Role::User);
        assert_eq!(session.messages()[1].content, "hi");
        // The new thread triggered a list refresh.
        assert_eq!(session.conversations().len(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_lands_in_transcript() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prompt/send"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "statusCode": 500,
                "message": "model overloaded"
            })))
            .mount(&server)
            .await;

        let mut session = session_for(&server);
        session.send("hello").await.unwrap();

        assert_eq!(session.messages().len(), 2);
        assert_eq!(
            session.messages()[1].content,
            crate::chat::reducer::SEND_FAILURE_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_open_replaces_transcript() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prompt/conversations/conv-2/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "statusCode": 200,
                "message": "ok",
                "body": [
                    {"role": "user", "content": "A"},
                    {"role": "assistant", "content": "B"}
                ]
            })))
            .mount(&server)
            .await;

        let mut session = session_for(&server);
        session.open("conv-2").await.unwrap();

        assert_eq!(session.conversation_id(), Some("conv-2"));
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_push_events_route_through_reducer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prompt/conversations/conv-1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "statusCode": 200,
                "message": "ok",
                "body": []
            })))
            .mount(&server)
            .await;

        let mut session = session_for(&server);
        session.open("conv-1").await.unwrap();

        session.handle_push(SocketEvent::NewMessage {
            role: Role::Assistant,
            content: "summary ready".to_string(),
            conversation_id: "conv-1".to_string(),
        });
        session.handle_push(SocketEvent::NewMessage {
            role: Role::Assistant,
            content: "elsewhere".to_string(),
            conversation_id: "conv-9".to_string(),
        });
        session.handle_push(SocketEvent::AiTyping {
            is_typing: true,
            conversation_id: "conv-1".to_string(),
        });

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, "summary ready");
    }
}
