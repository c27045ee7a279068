//! Conversation state types

use crate::llm::ErrorInfo;
use crate::message::Message;
use serde::Serialize;

/// Where the conversation is in its request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Ready for the next user turn
    #[default]
    Idle,
    /// Exactly one completion request is outstanding
    Sending,
}

/// Observable conversation state
///
/// `messages` only ever grows. `last_error` describes the most recent failed
/// attempt and is cleared as soon as a new attempt starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversationState {
    pub(crate) messages: Vec<Message>,
    pub(crate) phase: Phase,
    pub(crate) last_error: Option<ErrorInfo>,
}

impl ConversationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a completion request is outstanding
    #[must_use]
    pub fn pending(&self) -> bool {
        self.phase == Phase::Sending
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }
}

/// Static facts about the session that transitions may consult
#[derive(Debug, Clone)]
pub struct ConvContext {
    /// Whether the gateway holds a credential; if not, sends skip the request
    pub gateway_configured: bool,
}

impl ConvContext {
    #[must_use]
    pub fn new(gateway_configured: bool) -> Self {
        Self { gateway_configured }
    }
}
