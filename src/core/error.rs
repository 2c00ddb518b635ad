/// Errors raised while fetching a TVL series

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout, broken body stream
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response body is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// Valid JSON that is not an array of `{timestamp, tvl}` records
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(#[source] serde_json::Error),
}

impl FetchError {
    /// Short label used in the panel status line
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "network error",
            FetchError::Status { .. } => "bad status",
            FetchError::MalformedJson(_) => "malformed JSON",
            FetchError::UnexpectedShape(_) => "unexpected shape",
        }
    }
}
