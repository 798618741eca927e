use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// A page could not be retrieved; aborts the phase that requested it.
    #[error("failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// Rating glyph outside the half-star vocabulary. Callers treat it as unrated.
    #[error("unknown rating symbol: {0:?}")]
    UnknownSymbol(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl SourceError {
    pub fn fetch_failed(url: impl Into<String>, reason: impl ToString) -> Self {
        SourceError::FetchFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, SourceError::FetchFailed { .. })
    }
}
