//! Completion error types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classified failure of a single completion attempt
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {detail}")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ErrorInfo {
    #[must_use]
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn configuration_missing() -> Self {
        Self::new(
            ErrorKind::ConfigurationMissing,
            "No API credential configured",
        )
    }

    #[must_use]
    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, detail)
    }

    #[must_use]
    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, detail)
    }

    #[must_use]
    pub fn empty_response(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyResponse, detail)
    }

    #[must_use]
    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, detail)
    }
}

/// Error classification surfaced to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No credential; the request was never sent
    ConfigurationMissing,
    /// The service did not answer within the wait bound
    Timeout,
    /// Transport failure or an error status from the service
    Network,
    /// The service answered but without completion text
    EmptyResponse,
    /// Anything that fits none of the above, such as an unreadable reply
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ConfigurationMissing => "configuration_missing",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Network => "network",
            ErrorKind::EmptyResponse => "empty_response",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a non-success HTTP status into an error
pub(crate) fn from_status(status: u16, message: &str) -> ErrorInfo {
    match status {
        401 | 403 => ErrorInfo::network(format!("Authentication failed ({status}): {message}")),
        429 => ErrorInfo::network(format!("Rate limit exceeded: {message}")),
        400 => ErrorInfo::network(format!("Invalid request: {message}")),
        404 => ErrorInfo::network(format!("Endpoint or model not found: {message}")),
        500..=599 => ErrorInfo::network(format!("Server error ({status}): {message}")),
        _ => ErrorInfo::network(format!("HTTP {status}: {message}")),
    }
}
