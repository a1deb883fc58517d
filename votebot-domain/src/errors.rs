use thiserror::Error;

/// Failure to retrieve the external vote ranking. Fatal to the current cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network, DNS, TLS or timeout failure.
    #[error("ranking request failed for {url}: {message}")]
    Http { url: String, message: String },

    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("failed to read ranking body from {url}: {message}")]
    Body { url: String, message: String },

    /// Body was not the expected JSON document.
    #[error("malformed ranking payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
