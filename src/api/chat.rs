//! Conversation endpoints
//!
//! Synchronous half of the conversational sync layer: sending prompts and
//! fetching conversation state. The asynchronous half lives in
//! `crate::chat::socket`.

use crate::api::envelope::Envelope;
use crate::api::types::{ChatMessage, ConversationSummary, PromptReply, PromptRequest};
use crate::api::ApiClient;
use crate::error::Result;

impl ApiClient {
    /// `POST /prompt/send` — submit a prompt, optionally to an existing
    /// thread
    ///
    /// Omitting `conversation_id` starts a new thread; the reply then
    /// carries the server-assigned identifier.
    pub async fn send_prompt(
        &self,
        prompt: &str,
        conversation_id: Option<&str>,
    ) -> Result<Envelope<PromptReply>> {
        self.post_json(
            "/prompt/send",
            &PromptRequest {
                prompt: prompt.to_string(),
                conversation_id: conversation_id.map(str::to_string),
            },
            &[],
        )
        .await
    }

    /// `GET /prompt/conversations` — list the user's threads
    pub async fn list_conversations(&self) -> Result<Envelope<Vec<ConversationSummary>>> {
        self.get_json("/prompt/conversations", &[]).await
    }

    /// `GET /prompt/conversations/:id/messages` — full ordered history of
    /// one thread
    pub async fn message_history(&self, conversation_id: &str) -> Result<Envelope<Vec<ChatMessage>>> {
        self.get_json(
            &format!("/prompt/conversations/{}/messages", conversation_id),
            &[],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::ApiClient;
    use crate::api::types::Role;
    use crate::config::ApiConfig;
    use crate::store::{DurableSession, MemoryStore};
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let config = ApiConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
        };
        let session = DurableSession::new(Arc::new(MemoryStore::new()));
        ApiClient::new(&config, session).unwrap()
    }

    #[tokio::test]
    async fn test_send_prompt_new_thread_omits_conversation_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/prompt/send"))
            .and(body_json(serde_json::json!({"prompt": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "statusCode": 200,
                "message": "ok",
                "body": {"conversationId": "conv-1", "response": "hi there"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let reply = client
            .send_prompt("hello", None)
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        assert_eq!(reply.conversation_id.as_deref(), Some("conv-1"));
        assert_eq!(reply.response, "hi there");
    }

    #[tokio::test]
    async fn test_send_prompt_existing_thread_carries_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/prompt/send"))
            .and(body_json(serde_json::json!({
                "prompt": "more",
                "conversation_id": "conv-1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "statusCode": 200,
                "message": "ok",
                "body": {"conversationId": "conv-1", "response": "sure"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let reply = client
            .send_prompt("more", Some("conv-1"))
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        assert_eq!(reply.response, "sure");
    }

    #[tokio::test]
    async fn test_message_history_is_ordered() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/prompt/conversations/conv-1/messages"))
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

        let client = client_for(&server);
        let messages = client
            .message_history("conv-1")
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].content, "B");
    }

    #[tokio::test]
    async fn test_list_conversations() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/prompt/conversations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "statusCode": 200,
                "message": "ok",
                "body": [
                    {"id": "conv-1", "title": "Budget questions"},
                    {"id": "conv-2"}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let conversations = client
            .list_conversations()
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0].title.as_deref(), Some("Budget questions"));
        assert!(conversations[1].title.is_none());
    }
}
