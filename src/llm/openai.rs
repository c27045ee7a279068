//! `OpenAI` and `OpenAI`-compatible chat completion service

use super::config::{ConfigError, Credential};
use super::error::from_status;
use super::types::CompletionRequest;
use super::{CompletionService, ErrorInfo};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest slice of a response body quoted in an error detail
const BODY_EXCERPT_CHARS: usize = 512;

/// Chat completions over HTTP with a bearer credential
pub struct OpenAIService {
    client: Client,
    credential: Credential,
    endpoint: String,
    model: String,
}

impl OpenAIService {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        credential: Credential,
        base_url: &str,
        model: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        // The overall wait bound is enforced by the gateway, not the client.
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;

        Ok(Self {
            client,
            credential,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.into(),
        })
    }

    pub(crate) fn translate_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        translate_request(&self.model, request)
    }
}

pub(crate) fn translate_request(model: &str, request: &CompletionRequest) -> OpenAIRequest {
    OpenAIRequest {
        model: model.to_string(),
        messages: request
            .messages
            .iter()
            .map(|turn| OpenAIMessage {
                role: turn.role.as_str().to_string(),
                content: Some(turn.content.clone()),
            })
            .collect(),
        stream: false,
    }
}

/// Pick the first choice's text, rejecting replies without usable content
pub(crate) fn normalize_response(resp: OpenAIResponse) -> Result<String, ErrorInfo> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ErrorInfo::empty_response("No choices in response"))?;

    match choice.message.and_then(|m| m.content) {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(ErrorInfo::empty_response("Completion text was blank")),
        None => Err(ErrorInfo::empty_response("Completion had no content")),
    }
}

/// First `BODY_EXCERPT_CHARS` characters of `body`, marked when cut short
fn body_excerpt(body: &str) -> String {
    let mut chars = body.chars();
    let excerpt: String = chars.by_ref().take(BODY_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{excerpt}...")
    } else {
        excerpt
    }
}

fn classify_send_error(e: &reqwest::Error) -> ErrorInfo {
    if e.is_timeout() {
        ErrorInfo::timeout(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        ErrorInfo::network(format!("Connection failed: {e}"))
    } else if e.is_request() || e.is_body() {
        ErrorInfo::network(format!("Request failed: {e}"))
    } else {
        ErrorInfo::unknown(format!("Request failed: {e}"))
    }
}

#[async_trait]
impl CompletionService for OpenAIService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ErrorInfo> {
        let openai_request = self.translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.credential.expose())
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| classify_send_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ErrorInfo::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAIErrorResponse>(&body)
                .map_or(body, |resp| resp.error.message);
            return Err(from_status(status.as_u16(), &message));
        }

        let openai_response: OpenAIResponse = serde_json::from_str(&body).map_err(|e| {
            ErrorInfo::unknown(format!(
                "Failed to parse response: {e} - body: {}",
                body_excerpt(&body)
            ))
        })?;

        normalize_response(openai_response)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
pub(crate) struct OpenAIRequest {
    pub(crate) model: String,
    pub(crate) messages: Vec<OpenAIMessage>,
    pub(crate) stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OpenAIMessage {
    #[serde(default)]
    pub(crate) role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAIResponse {
    #[serde(default)]
    pub(crate) choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAIChoice {
    #[serde(default)]
    pub(crate) message: Option<OpenAIMessage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}
