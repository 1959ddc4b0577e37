use thiserror::Error;

/// Errors surfaced by the client library.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure: connection refused, DNS, timeout, bad body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the payload with a list of validation messages.
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    /// Any other non-success response, with the server's error string.
    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Reading or writing the offline cache file failed.
    #[error("cache I/O failed: {0}")]
    Cache(#[from] std::io::Error),

    /// The cache file (or a server payload) did not parse.
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether this error means the server was unreachable (as opposed to a
    /// definitive rejection). Unreachable errors are what flip the sync
    /// store into offline mode.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Http(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }
}
