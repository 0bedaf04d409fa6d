//! Conversation session state.
//!
//! Holds the ordered message sequence for the chat advisor. Message ids are
//! generated client-side so streaming updates can target a message before the
//! server round-trip completes, which lets a renderer show the reply as it
//! arrives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::Clarification;

/// The role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Client-generated unique id (UUID v4).
    pub id: String,
    pub role: MessageRole,
    /// Message text; mutated in place while a reply streams in.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// True while chunks for this message are still arriving.
    pub is_streaming: bool,
    /// Structured follow-up question attached by the backend, if any.
    pub clarification: Option<Clarification>,
}

/// The caller-supplied part of a new message.
///
/// `add_message` fills in the id and timestamp.
#[derive(Debug, Clone, Default)]
pub struct MessageDraft {
    pub role: Option<MessageRole>,
    pub content: String,
    pub is_streaming: bool,
    pub clarification: Option<Clarification>,
}

impl MessageDraft {
    /// Draft for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Some(MessageRole::User),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Draft for an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Some(MessageRole::Assistant),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Marks the draft as streaming (content will arrive in chunks).
    pub fn streaming(mut self) -> Self {
        self.is_streaming = true;
        self
    }
}

/// Conversation session store.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    /// Ordered message sequence (append-only; arrival order).
    pub messages: Vec<Message>,
    /// Jurisdiction the advisor answers for.
    pub jurisdiction: String,
    /// True while a request for this session is in flight.
    pub loading: bool,
    /// Name of the tool the backend is currently running, if any.
    pub current_tool: Option<String>,
    /// Last error surfaced to the session, if any.
    pub error: Option<String>,
}

impl ConversationState {
    /// Creates a conversation for the given jurisdiction.
    pub fn new(jurisdiction: impl Into<String>) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            ..Self::default()
        }
    }

    /// Appends a message and returns its generated id.
    ///
    /// Missing draft fields default (role: user, empty content).
    pub fn add_message(&mut self, draft: MessageDraft) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.messages.push(Message {
            id: id.clone(),
            role: draft.role.unwrap_or(MessageRole::User),
            content: draft.content,
            timestamp: Utc::now(),
            is_streaming: draft.is_streaming,
            clarification: draft.clarification,
        });
        id
    }

    /// Replaces the content of the message with the given id.
    /// No-op if the id is unknown.
    pub fn update_message(&mut self, id: &str, content: impl Into<String>) {
        if let Some(message) = self.message_mut(id) {
            message.content = content.into();
        }
    }

    /// Attaches or clears the clarification payload on one message.
    /// No-op if the id is unknown.
    pub fn set_clarification(&mut self, id: &str, clarification: Option<Clarification>) {
        if let Some(message) = self.message_mut(id) {
            message.clarification = clarification;
        }
    }

    /// Toggles the live-typing flag on one message.
    /// No-op if the id is unknown.
    pub fn set_streaming(&mut self, id: &str, is_streaming: bool) {
        if let Some(message) = self.message_mut(id) {
            message.is_streaming = is_streaming;
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_jurisdiction(&mut self, jurisdiction: impl Into<String>) {
        self.jurisdiction = jurisdiction.into();
    }

    pub fn set_current_tool(&mut self, tool: Option<String>) {
        self.current_tool = tool;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Empties the message sequence and clears the tool indicator.
    ///
    /// Jurisdiction and the loading flag are left untouched.
    pub fn clear_chat(&mut self) {
        self.messages.clear();
        self.current_tool = None;
    }

    fn message_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }
}
