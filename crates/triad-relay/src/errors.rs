use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("downstream unreachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("downstream {url} rejected the request with status {status}")]
    Rejected { url: String, status: u16 },

    #[error("invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

impl RelayError {
    /// Status returned by the peer, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RelayError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, RelayError::Unreachable { .. })
    }
}
