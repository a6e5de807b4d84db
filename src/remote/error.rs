//! Errors raised at the remote task service boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Server did not report success")]
    Unsuccessful,

    #[error("Malformed response: {0}")]
    Malformed(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Coarse classification used when logging a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// The request never produced a response.
    Transport,
    /// A response arrived but was an error, unsuccessful or undecodable.
    Response,
}

impl std::fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Response => write!(f, "response"),
        }
    }
}

impl RemoteError {
    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            Self::Transport(_) | Self::Timeout(_) => RemoteErrorKind::Transport,
            Self::Status { .. } | Self::Unsuccessful | Self::Malformed(_) => {
                RemoteErrorKind::Response
            }
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::Transport(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            Self::Malformed(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}
