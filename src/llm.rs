//! Completion service abstraction
//!
//! The `Gateway` is what the orchestrator talks to. Underneath it a
//! `CompletionService` performs the actual request, which keeps the HTTP
//! provider swappable and lets tests substitute scripted services.

mod config;
mod error;
mod gateway;
mod openai;
mod types;

#[cfg(test)]
mod proptests;

pub use config::{ConfigError, Credential, LlmConfig, DEFAULT_MODEL, DEFAULT_TIMEOUT};
pub use error::{ErrorInfo, ErrorKind};
pub use gateway::{Gateway, OnlineGateway};
pub use openai::OpenAIService;
pub use types::{ChatRole, ChatTurn, CompletionRequest};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for chat completion providers
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Request a completion and return its text
    ///
    /// # Errors
    ///
    /// Returns a classified `ErrorInfo` when no usable text comes back.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ErrorInfo>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for Arc<T> {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ErrorInfo> {
        (**self).complete(request).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Logging wrapper for completion services
pub struct LoggingService {
    inner: Arc<dyn CompletionService>,
    model_id: String,
}

impl LoggingService {
    #[must_use]
    pub fn new(inner: Arc<dyn CompletionService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl CompletionService for LoggingService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ErrorInfo> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(text) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    turns = request.messages.len(),
                    reply_chars = text.chars().count(),
                    "Completion request succeeded"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    kind = %e.kind,
                    error = %e.detail,
                    "Completion request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
