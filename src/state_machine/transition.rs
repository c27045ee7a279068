//! Pure state transition function

use super::{ConvContext, ConversationState, Effect, Event, Phase};
use crate::llm::ErrorInfo;
use crate::message::Role;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConversationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: ConversationState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Message is blank")]
    BlankMessage,
    #[error("A reply is still pending, cannot accept another message")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; all I/O is
/// expressed as returned effects.
///
/// # Errors
///
/// Blank or overlapping user input and completions that arrive while idle
/// are rejected without changing the state.
pub fn transition(
    state: &ConversationState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.phase, event) {
        (_, Event::UserMessage { message }) if message.is_blank() => {
            Err(TransitionError::BlankMessage)
        }

        (_, Event::UserMessage { message }) if message.role() != Role::User => Err(
            TransitionError::InvalidTransition(format!("user turn with role {}", message.role())),
        ),

        // Idle + UserMessage -> Sending
        (Phase::Idle, Event::UserMessage { message }) => {
            let history = state.messages.clone();
            let text = message.content().to_string();

            let mut next = state.clone();
            next.messages.push(message);
            next.phase = Phase::Sending;
            next.last_error = None;

            let follow_up = if context.gateway_configured {
                Effect::RequestCompletion { history, text }
            } else {
                Effect::FailWithoutRequest {
                    error: ErrorInfo::configuration_missing(),
                }
            };

            Ok(TransitionResult::new(next)
                .with_effect(Effect::PublishState)
                .with_effect(follow_up))
        }

        // One outstanding request at a time
        (Phase::Sending, Event::UserMessage { .. }) => Err(TransitionError::Busy),

        // Sending + CompletionSucceeded -> Idle
        (Phase::Sending, Event::CompletionSucceeded { message }) => {
            let mut next = state.clone();
            next.messages.push(message);
            next.phase = Phase::Idle;

            Ok(TransitionResult::new(next).with_effect(Effect::PublishState))
        }

        // Sending + CompletionFailed -> Idle with fallback turn and error
        (Phase::Sending, Event::CompletionFailed { error, fallback }) => {
            let mut next = state.clone();
            next.messages.push(fallback);
            next.phase = Phase::Idle;
            next.last_error = Some(error.clone());

            Ok(TransitionResult::new(next)
                .with_effect(Effect::PublishState)
                .with_effect(Effect::notify_error(error)))
        }

        (Phase::Idle, Event::CompletionSucceeded { .. } | Event::CompletionFailed { .. }) => {
            Err(TransitionError::InvalidTransition(
                "completion arrived with no request outstanding".to_string(),
            ))
        }
    }
}
