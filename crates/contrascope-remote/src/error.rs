use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// The endpoint does not exist (HTTP 404).
    #[error("no remote endpoint at {0}")]
    NoEndpoint(String),

    #[cfg(feature = "http")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}
