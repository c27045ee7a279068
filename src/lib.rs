//! aichat - conversational client core
//!
//! Keeps an ordered history between a user and an assistant, forwards each
//! new user turn with its context to a chat-completion service, and folds
//! the reply (or a fallback turn on failure) back into the conversation.
//! Every state change is published to subscribers.

pub mod llm;
pub mod message;
pub mod runtime;
pub mod state_machine;
pub mod system_prompt;

pub use llm::{ErrorInfo, ErrorKind, Gateway, LlmConfig};
pub use message::{Message, Role};
pub use runtime::{ConversationEvent, Orchestrator, SendOutcome};
pub use state_machine::{ConversationState, Phase};
