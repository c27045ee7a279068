//! Events that can occur in a conversation

use crate::llm::ErrorInfo;
use crate::message::Message;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// The user submitted a turn
    UserMessage { message: Message },

    /// The gateway produced the assistant's reply
    CompletionSucceeded { message: Message },
    /// The attempt failed; `fallback` is appended in place of a reply
    CompletionFailed { error: ErrorInfo, fallback: Message },
}

impl Event {
    #[must_use]
    pub fn user_message(text: impl Into<String>) -> Self {
        Event::UserMessage {
            message: Message::user(text),
        }
    }

    #[must_use]
    pub fn completion_failed(error: ErrorInfo) -> Self {
        Event::CompletionFailed {
            error,
            fallback: Message::fallback(),
        }
    }
}

impl From<Result<Message, ErrorInfo>> for Event {
    fn from(result: Result<Message, ErrorInfo>) -> Self {
        match result {
            Ok(message) => Event::CompletionSucceeded { message },
            Err(error) => Event::completion_failed(error),
        }
    }
}
