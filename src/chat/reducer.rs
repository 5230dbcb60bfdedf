//! Conversation view state
//!
//! A pure reducer over the currently-open conversation. Events come from
//! three sources: the user (submissions, thread switches), the REST sync
//! path (send outcomes, fetched history), and the push channel. The
//! reducer decides what lands in the transcript and returns the effects
//! the driver must carry out; it performs no IO itself.

use crate::api::types::ChatMessage;

/// Transcript line shown when a send fails outright
pub const SEND_FAILURE_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Transcript line shown when a reply envelope carries no response text
pub const EMPTY_REPLY_MESSAGE: &str = "Sorry, I encountered an error processing your request.";

/// An input to the reducer
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// The user submitted prompt text
    Submitted { text: String },
    /// The REST send completed with a reply
    SendSucceeded {
        /// Server-assigned thread id, set when the send started a new
        /// thread
        conversation_id: Option<String>,
        reply: String,
    },
    /// The REST send failed (network error or error envelope)
    SendFailed,
    /// The push channel delivered a message
    Pushed {
        conversation_id: String,
        message: ChatMessage,
    },
    /// A thread's full history was fetched
    Opened {
        conversation_id: String,
        messages: Vec<ChatMessage>,
    },
    /// The user started a fresh thread
    NewChat,
}

/// An action the driver must perform after applying an event
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Submit the prompt over REST
    SendPrompt {
        prompt: String,
        conversation_id: Option<String>,
    },
    /// Re-fetch the thread list (a new thread now exists server-side)
    RefreshConversations,
}

/// State of the open conversation
#[derive(Debug, Default)]
pub struct ConversationReducer {
    conversation_id: Option<String>,
    messages: Vec<ChatMessage>,
    awaiting_reply: bool,
}

impl ConversationReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server-assigned id of the open thread; `None` until the first
    /// reply of a new thread arrives
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// The transcript in display order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a send is in flight
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Apply one event and return the effects it demands
    pub fn apply(&mut self, event: ChatEvent) -> Vec<Effect> {
        match event {
            ChatEvent::Submitted { text } => {
                let text = text.trim().to_string();
                // Blank input and double-submits are dropped silently.
                if text.is_empty() || self.awaiting_reply {
                    return Vec::new();
                }
                self.messages.push(ChatMessage::user(&text));
                self.awaiting_reply = true;
                vec![Effect::SendPrompt {
                    prompt: text,
                    conversation_id: self.conversation_id.clone(),
                }]
            }

            ChatEvent::SendSucceeded {
                conversation_id,
                reply,
            } => {
                let mut effects = Vec::new();
                if let Some(id) = conversation_id {
                    if self.conversation_id.is_none() {
                        self.conversation_id = Some(id);
                        effects.push(Effect::RefreshConversations);
                    }
                }
                self.messages.push(ChatMessage::assistant(&reply));
                self.awaiting_reply = false;
                effects
            }

            ChatEvent::SendFailed => {
                self.messages.push(ChatMessage::assistant(SEND_FAILURE_MESSAGE));
                self.awaiting_reply = false;
                Vec::new()
            }

            ChatEvent::Pushed {
                conversation_id,
                message,
            } => {
                if self.conversation_id.as_deref() != Some(conversation_id.as_str()) {
                    tracing::debug!(
                        "Discarding push for foreign conversation {}",
                        conversation_id
                    );
                } else if self.awaiting_reply {
                    // The in-flight sync reply is the sole source for the
                    // current exchange; the push copy would duplicate it.
                    tracing::debug!("Suppressing push echo of in-flight exchange");
                } else {
                    self.messages.push(message);
                }
                Vec::new()
            }

            ChatEvent::Opened {
                conversation_id,
                messages,
            } => {
                self.conversation_id = Some(conversation_id);
                self.messages = messages;
                self.awaiting_reply = false;
                Vec::new()
            }

            ChatEvent::NewChat => {
                self.conversation_id = None;
                self.messages.clear();
                self.awaiting_reply = false;
                Vec::new()
            }
        }
    }
}
