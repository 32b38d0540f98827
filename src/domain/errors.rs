use thiserror::Error;

/// Failures reported by a [`MapBackend`](crate::domain::MapBackend) call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    /// The session lookup reported no such session.
    #[error("session {session_no} was not found")]
    NotFound { session_no: String },
    /// The request never produced a usable response.
    #[error("transport failed: {message}")]
    Transport { message: String },
    /// The backend answered but refused the request.
    #[error("backend rejected request: {message}")]
    Rejected { message: String },
    /// The response body did not match the expected shape.
    #[error("response decode failed: {message}")]
    Decode { message: String },
}

impl BackendError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected { message: message.into() }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }

    /// The bare message shown to the participant, without the error category.
    pub fn message(&self) -> String {
        match self {
            BackendError::NotFound { session_no } => format!("session {} was not found", session_no),
            BackendError::Transport { message }
            | BackendError::Rejected { message }
            | BackendError::Decode { message } => message.clone(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
