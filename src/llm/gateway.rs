//! Completion gateway
//!
//! Whether completions are possible at all is decided once, when the gateway
//! is built: with a credential it is `Online` and owns a service, without one
//! it is `Offline` and every call fails with `ConfigurationMissing` before any
//! I/O happens.

use super::config::{ConfigError, LlmConfig};
use super::types::CompletionRequest;
use super::{CompletionService, ErrorInfo, LoggingService, OpenAIService};
use crate::message::Message;
use crate::system_prompt::build_system_prompt;
use std::sync::Arc;
use std::time::Duration;

/// Entry point for completion requests
pub enum Gateway {
    Online(OnlineGateway),
    Offline,
}

impl Gateway {
    /// Build the gateway described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        let Some(credential) = config.credential.clone() else {
            tracing::warn!("No API credential configured, completions are disabled");
            return Ok(Gateway::Offline);
        };

        let service = OpenAIService::new(credential, &config.base_url, config.model.clone())?;
        let service: Arc<dyn CompletionService> = Arc::new(LoggingService::new(Arc::new(service)));

        tracing::info!(
            model = %config.model,
            base_url = %config.base_url,
            timeout_secs = config.timeout.as_secs(),
            "Completion gateway online"
        );

        Ok(Gateway::Online(
            OnlineGateway::new(service, config.timeout).with_persona(config.persona.as_deref()),
        ))
    }

    /// Online gateway over an arbitrary service
    #[must_use]
    pub fn online(service: Arc<dyn CompletionService>, timeout: Duration) -> Self {
        Gateway::Online(OnlineGateway::new(service, timeout))
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self, Gateway::Online(_))
    }

    /// Ask for the assistant's reply to `new_user_text` given the prior `history`
    ///
    /// # Errors
    ///
    /// `ConfigurationMissing` when offline, otherwise whatever the online
    /// gateway reports.
    pub async fn complete(
        &self,
        history: &[Message],
        new_user_text: &str,
    ) -> Result<Message, ErrorInfo> {
        match self {
            Gateway::Online(gateway) => gateway.complete(history, new_user_text).await,
            Gateway::Offline => Err(ErrorInfo::configuration_missing()),
        }
    }
}

/// A gateway that can reach the completion service
pub struct OnlineGateway {
    service: Arc<dyn CompletionService>,
    persona: String,
    timeout: Duration,
}

impl OnlineGateway {
    #[must_use]
    pub fn new(service: Arc<dyn CompletionService>, timeout: Duration) -> Self {
        Self {
            service,
            persona: build_system_prompt(None),
            timeout,
        }
    }

    #[must_use]
    pub fn with_persona(mut self, persona: Option<&str>) -> Self {
        self.persona = build_system_prompt(persona);
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// # Errors
    ///
    /// `Timeout` when the service does not answer within the bound,
    /// `EmptyResponse` for a blank reply, and `Unknown` for blank input.
    /// Service errors pass through unchanged.
    pub async fn complete(
        &self,
        history: &[Message],
        new_user_text: &str,
    ) -> Result<Message, ErrorInfo> {
        if new_user_text.trim().is_empty() {
            return Err(ErrorInfo::unknown("Refusing to request a completion for blank input"));
        }

        let request = CompletionRequest::build(&self.persona, history, new_user_text);

        // Whichever settles first wins; on expiry the request future is dropped.
        match tokio::time::timeout(self.timeout, self.service.complete(&request)).await {
            Ok(Ok(text)) if text.trim().is_empty() => {
                Err(ErrorInfo::empty_response("Completion text was blank"))
            }
            Ok(Ok(text)) => Ok(Message::assistant(text)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ErrorInfo::timeout(format!(
                "No response from {} within {}s",
                self.service.model_id(),
                self.timeout.as_secs()
            ))),
        }
    }
}
