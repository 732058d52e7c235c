use thiserror::Error;

/// Failures talking to the Plex server
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid Plex token (server answered {status})")]
    Unauthorized { status: u16 },

    #[error("Could not connect to Plex server at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Library '{0}' not found")]
    LibraryNotFound(String),

    #[error("{context}: server answered HTTP {status}")]
    Status { context: String, status: u16 },

    #[error("{context}: {reason}")]
    Request { context: String, reason: String },

    #[error("Unexpected response from Plex: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Timestamp {0} cannot be represented on this machine")]
    InvalidTimestamp(String),

    #[error("Not authenticated to Plex")]
    NotAuthenticated,
}

impl SourceError {
    /// Authorization and transport failures, as opposed to a single bad request
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            SourceError::Unauthorized { .. } | SourceError::Unreachable { .. } | SourceError::NotAuthenticated
        )
    }
}
