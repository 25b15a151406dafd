use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single remote request. Never fatal: callers log it and skip the unit of work.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot build request URL from {base}: {reason}")]
    InvalidUrl { base: String, reason: String },
}
