//! Conversation orchestrator

use super::{ConversationEvent, Publisher};
use crate::llm::{ErrorKind, Gateway};
use crate::message::Message;
use crate::state_machine::{
    transition, ConvContext, ConversationState, Effect, Event, TransitionError,
};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio_stream::Stream;

/// What became of a `send_message` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing changed
    Ignored,
    /// A reply was still pending; the message was not accepted
    Busy,
    /// The assistant's reply was appended
    Replied,
    /// The fallback turn was appended and the error published
    Fallback(ErrorKind),
}

/// A completion the gateway still has to answer
struct PendingRequest {
    history: Vec<Message>,
    text: String,
}

/// Owns one conversation and sequences user input through the gateway
///
/// State is only touched under the lock, and the lock is never held across
/// the gateway call. Publishing happens under the lock, so subscribers see
/// changes in the order they were made.
pub struct Orchestrator {
    session: Arc<Session>,
}

struct Session {
    context: ConvContext,
    state: Mutex<ConversationState>,
    gateway: Gateway,
    publisher: Publisher,
}

impl Orchestrator {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self {
            session: Arc::new(Session {
                context: ConvContext::new(gateway.is_configured()),
                state: Mutex::new(ConversationState::new()),
                gateway,
                publisher: Publisher::default(),
            }),
        }
    }

    /// Receive every state change and error from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.session.publisher.subscribe()
    }

    /// Stream form of `subscribe`
    #[must_use]
    pub fn events(&self) -> impl Stream<Item = ConversationEvent> + Send + 'static {
        self.session.publisher.stream()
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> ConversationState {
        self.session.state.lock().await.clone()
    }

    /// Append a user turn and settle it with a reply or the fallback turn
    ///
    /// Never fails: gateway errors end up in the conversation as the
    /// fallback message and on the error side channel. Once the user turn
    /// is accepted the attempt is settled by a background task, so dropping
    /// the returned future does not leave the conversation pending.
    pub async fn send_message(&self, text: impl Into<String>) -> SendOutcome {
        let request = match self.session.process_event(Event::user_message(text)).await {
            Ok(request) => request,
            Err(TransitionError::BlankMessage) => {
                tracing::debug!("Ignoring blank message");
                return SendOutcome::Ignored;
            }
            Err(TransitionError::Busy) => {
                tracing::warn!("Rejecting message, a reply is still pending");
                return SendOutcome::Busy;
            }
            Err(e) => {
                tracing::error!(error = %e, "Unexpected transition failure");
                return SendOutcome::Ignored;
            }
        };

        // Without a request the attempt was already settled locally
        let Some(request) = request else {
            return SendOutcome::Fallback(ErrorKind::ConfigurationMissing);
        };

        let session = self.session.clone();
        let handle = tokio::spawn(async move { session.settle(request).await });

        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Completion task did not finish");
                SendOutcome::Fallback(ErrorKind::Unknown)
            }
        }
    }
}

impl Session {
    /// Run the gateway call and apply its result
    async fn settle(&self, PendingRequest { history, text }: PendingRequest) -> SendOutcome {
        tracing::info!(history_len = history.len(), "Requesting completion");
        let result = self.gateway.complete(&history, &text).await;
        let outcome = match &result {
            Ok(_) => SendOutcome::Replied,
            Err(e) => SendOutcome::Fallback(e.kind),
        };

        if let Err(e) = self.process_event(Event::from(result)).await {
            tracing::error!(error = %e, "Failed to apply completion result");
        }

        outcome
    }

    async fn process_event(&self, event: Event) -> Result<Option<PendingRequest>, TransitionError> {
        let mut state = self.state.lock().await;
        let mut events_to_process = vec![event];
        let mut request = None;

        while let Some(current_event) = events_to_process.pop() {
            let result = transition(&state, &self.context, current_event)?;
            *state = result.new_state;

            for effect in result.effects {
                match effect {
                    Effect::PublishState => {
                        self.publisher
                            .publish(ConversationEvent::StateChanged(state.clone()));
                    }
                    Effect::NotifyError { error } => {
                        tracing::warn!(kind = %error.kind, detail = %error.detail, "Completion failed, fallback shown");
                        self.publisher.publish(ConversationEvent::Error(error));
                    }
                    Effect::RequestCompletion { history, text } => {
                        request = Some(PendingRequest { history, text });
                    }
                    Effect::FailWithoutRequest { error } => {
                        tracing::debug!(kind = %error.kind, "Settling without a request");
                        events_to_process.push(Event::completion_failed(error));
                    }
                }
            }
        }

        Ok(request)
    }
}
