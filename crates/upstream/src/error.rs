//! Upstream failure types.
//!
//! Every client converts whatever went wrong on the wire into an
//! [`UpstreamError`]. The orchestrator never propagates these; they end up
//! as failed outcomes in the response.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using UpstreamError.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpstreamError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Upstream returned {code}: {message}")]
    Protocol { code: String, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("No usable data: {0}")]
    EmptyResult(String),
}

/// Coarse failure classes the caller reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or timeout
    Transport,
    /// Non-OK result code or a payload that could not be read
    Protocol,
    /// Well-formed answer with nothing usable in it
    EmptyResult,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Protocol => "protocol",
            ErrorKind::EmptyResult => "empty",
        }
    }
}

impl UpstreamError {
    pub fn protocol(code: impl Into<String>, message: impl Into<String>) -> Self {
        UpstreamError::Protocol {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UpstreamError::Transport(_) | UpstreamError::Timeout(_) => ErrorKind::Transport,
            UpstreamError::Protocol { .. } | UpstreamError::Malformed(_) => ErrorKind::Protocol,
            UpstreamError::EmptyResult(_) => ErrorKind::EmptyResult,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Malformed(err.to_string())
    }
}

impl From<quick_xml::DeError> for UpstreamError {
    fn from(err: quick_xml::DeError) -> Self {
        UpstreamError::Malformed(err.to_string())
    }
}
