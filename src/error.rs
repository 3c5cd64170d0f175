//! Provider error types
//!
//! Errors are split into transient failures (worth retrying) and permanent
//! ones (fail immediately). `RetryPolicy` consults `is_transient()` to
//! decide which is which.

use thiserror::Error;

/// Errors surfaced by a provider handler.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No API key available at construction time.
    #[error("API key is missing; set it in HandlerOptions or TELKOM_AI_API_KEY")]
    MissingApiKey,

    /// Upstream returned HTTP 429.
    #[error("rate limited by upstream: {0}")]
    RateLimited(String),

    /// Upstream returned a non-2xx status other than 429.
    #[error("upstream error {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response parsed, but the expected fields were not there.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// The caller's cancellation token fired.
    #[error("request cancelled")]
    Cancelled,
}

impl ProviderError {
    /// Whether a retry has any chance of succeeding.
    ///
    /// Rate limits, 5xx responses and transport errors are transient;
    /// everything else fails on the first attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::RateLimited(_) => true,
            ProviderError::UpstreamStatus { status, .. } => (500..=599).contains(status),
            ProviderError::Network(_) => true,
            ProviderError::MissingApiKey
            | ProviderError::MalformedResponse(_)
            | ProviderError::Cancelled => false,
        }
    }
}
