//! Gateway configuration

use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Upper bound on how long a single completion may take
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer credential for the completion service
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Blank keys count as absent
    #[must_use]
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Errors raised while turning configuration into a gateway
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration for the completion service
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub credential: Option<Credential>,
    /// OpenAI-compatible base URL (proxies and gateways included)
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Replaces the default persona preamble when set
    pub persona: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            credential: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            persona: None,
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let timeout = match lookup("AICHAT_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "Ignoring invalid AICHAT_TIMEOUT_SECS");
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        Self {
            credential: lookup("OPENAI_API_KEY").and_then(Credential::new),
            base_url: lookup("OPENAI_BASE_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.base_url),
            model: lookup("AICHAT_MODEL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.model),
            timeout,
            persona: lookup("AICHAT_PERSONA").filter(|s| !s.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn with_credential(mut self, key: impl Into<String>) -> Self {
        self.credential = Credential::new(key);
        self
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}
