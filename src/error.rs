//! Error types for the search and language-model collaborators

use thiserror::Error;

/// Errors raised by a language-model backend
#[derive(Error, Debug)]
pub enum LlmError {
    /// Transport failure talking to the model server
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Model server answered with a non-2xx status
    #[error("model server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Payload could not be decoded
    #[error("invalid model response: {0}")]
    InvalidResponse(String),

    /// Schema-constrained extraction requested from a model that lacks it
    #[error("model {0} does not support structured output")]
    StructuredUnsupported(String),
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Errors raised by a search provider
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport failure talking to the provider
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-2xx status
    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// Provider refused the request with 429
    #[error("{0} rate limit exceeded")]
    RateLimited(String),

    /// Payload could not be decoded
    #[error("invalid search response: {0}")]
    InvalidResponse(String),

    /// Provider needs a key that was not configured
    #[error("{0} API key is not configured")]
    MissingApiKey(String),

    /// Unknown provider name in settings
    #[error("unknown search provider: {0}")]
    UnknownProvider(String),
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
