//! Common types for completion requests

use crate::message::{Message, Role};

/// Role of a turn as the completion service sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl From<Role> for ChatRole {
    /// Only user turns keep their role; everything else replays as assistant.
    fn from(role: Role) -> Self {
        match role {
            Role::User => ChatRole::User,
            Role::Assistant | Role::System => ChatRole::Assistant,
        }
    }
}

/// One turn in an outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    #[must_use]
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered request sent to the completion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatTurn>,
}

impl CompletionRequest {
    /// Persona preamble first, then the prior history, then the new user turn
    #[must_use]
    pub fn build(persona: &str, history: &[Message], new_user_text: &str) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatTurn::new(ChatRole::System, persona));
        messages.extend(
            history
                .iter()
                .map(|msg| ChatTurn::new(msg.role().into(), msg.content())),
        );
        messages.push(ChatTurn::new(ChatRole::User, new_user_text));
        Self { messages }
    }
}
