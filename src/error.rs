use thiserror::Error;

/// Failures while setting up a test request.
///
/// None of these are meant to be recovered from: they mean the test itself is
/// wrong, so the chain stops at the first `?`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read body: {0}")]
    Body(#[from] std::io::Error),

    #[error("invalid target {target:?}: {source}")]
    Target {
        target: String,
        source: url::ParseError,
    },

    #[error("parse query failed: {0}")]
    Query(String),

    #[error("param key should be a valid identifier: {0:?}")]
    ParamKey(String),

    #[error("param {key:?} cannot be the dot segment {value:?}")]
    ParamValue { key: String, value: String },

    #[error("invalid header name: {0}")]
    HeaderName(#[from] reqwest::header::InvalidHeaderName),

    #[error("invalid header value: {0}")]
    HeaderValue(#[from] reqwest::header::InvalidHeaderValue),
}
