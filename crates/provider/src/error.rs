//! Provider and normalization error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider error {code}: {message}")]
    Api { code: String, message: String },

    #[error("response decode error: {0}")]
    Decode(String),

    #[error("not configured: {0}")]
    NotConfigured(String),
}

/// Why a single provider record was dropped.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid timestamp in `{field}`: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("invalid number in `{field}`: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}
