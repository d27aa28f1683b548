use protocol::TimestampError;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("api token unavailable: {0}")]
    Token(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

impl SourceError {
    pub fn is_decode(&self) -> bool {
        matches!(self, SourceError::Decode { .. })
    }
}
