use thiserror::Error;

/// Errors from calls to the agent backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("not found")]
    NotFound,

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("response body read: {0}")]
    Stream(String),
}

/// Violations of the conversation log's append-only invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("message {index} is still streaming")]
    OpenMessagePending { index: usize },

    #[error("no message is streaming")]
    NoOpenMessage,
}

/// Errors surfaced by the conversation driver.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no active session")]
    NoSession,

    #[error("a turn is already in flight")]
    TurnInFlight,

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("conversation log: {0}")]
    Log(#[from] LogError),
}

/// Errors from the document upload collaborator.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_status_display() {
        let err = BackendError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
    }

    #[test]
    fn test_chat_error_from_backend() {
        let err: ChatError = BackendError::Transport("connection refused".to_string()).into();
        assert!(matches!(err, ChatError::Backend(BackendError::Transport(_))));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_log_error_display() {
        let err = LogError::OpenMessagePending { index: 3 };
        assert_eq!(err.to_string(), "message 3 is still streaming");
    }

    #[test]
    fn test_upload_error_display() {
        let err = UploadError::Rejected("No filename provided".to_string());
        assert_eq!(err.to_string(), "upload rejected: No filename provided");
    }
}
