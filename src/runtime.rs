//! Runtime for a single conversation session
//!
//! The `Orchestrator` executes state machine effects and publishes every
//! state change to subscribers over a broadcast channel.

mod orchestrator;

#[cfg(test)]
pub mod testing;

pub use orchestrator::{Orchestrator, SendOutcome};

use crate::llm::ErrorInfo;
use crate::state_machine::ConversationState;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

/// Buffered events per subscriber before it starts lagging
const EVENT_CAPACITY: usize = 128;

/// Events sent to subscribers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// Full snapshot after a state change
    StateChanged(ConversationState),
    /// Side-channel notice for a failed attempt, sent after its state change
    Error(ErrorInfo),
}

/// Fan-out of conversation events to any number of subscribers
#[derive(Debug, Clone)]
pub struct Publisher {
    tx: broadcast::Sender<ConversationEvent>,
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new(EVENT_CAPACITY)
    }
}

impl Publisher {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: ConversationEvent) {
        // Publishing with nobody listening is normal
        if self.tx.send(event).is_err() {
            tracing::trace!("No subscribers for conversation event");
        }
    }

    /// Receive every event published from now on; drop the receiver to unsubscribe
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.tx.subscribe()
    }

    /// Same as `subscribe`, as a stream that skips over lag
    #[must_use]
    pub fn stream(&self) -> impl Stream<Item = ConversationEvent> + Send + 'static {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|item| match item {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Subscriber lagged, events dropped");
                None
            }
        })
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
