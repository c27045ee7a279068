//! Effects produced by state transitions

use crate::llm::ErrorInfo;
use crate::message::Message;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Publish the new state to subscribers
    PublishState,

    /// Publish an error on the side channel
    NotifyError { error: ErrorInfo },

    /// Ask the gateway for a reply to `text`, with `history` as context
    RequestCompletion { history: Vec<Message>, text: String },

    /// Settle the attempt as failed without contacting the gateway
    FailWithoutRequest { error: ErrorInfo },
}

impl Effect {
    #[must_use]
    pub fn notify_error(error: ErrorInfo) -> Self {
        Effect::NotifyError { error }
    }
}
