//! Failure modes of a search round trip.

/// Every variant degrades only the panel that issued the request.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The backend could not be reached or the connection dropped.
    #[error("Search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Search backend answered {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not JSON at all. Partial payloads are not errors; the normalizer skips what is missing.
    #[error("Search backend returned malformed JSON: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// A newer search was issued, or the session was closed, before this one finished.
    #[error("Search request was superseded")]
    Cancelled,
}

impl SearchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
