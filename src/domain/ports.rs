//! Backend contract the registration workflow depends on.
//!
//! Calls are blocking; the application layer runs them on worker threads so
//! the terminal loop never waits on the network.

use crate::domain::{BackendResult, Session, User};

/// How the backend acknowledged a saved user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAck {
    /// Stored, but a read issued right away may not observe it yet.
    Accepted,
    /// Stored and guaranteed visible to the next roster read.
    Committed,
}

/// Backend of record for sessions and their rosters.
pub trait MapBackend: Send + Sync {
    /// Fetch session and map metadata.
    ///
    /// Returns [`BackendError::NotFound`](crate::domain::BackendError::NotFound)
    /// when the backend reports no such session.
    fn fetch_session(&self, session_no: &str) -> BackendResult<Session>;

    /// Fetch every user registered to the session.
    ///
    /// `Ok(None)` means the backend answered without a roster.
    fn fetch_users(&self, session_no: &str) -> BackendResult<Option<Vec<User>>>;

    /// Persist one user into the session roster.
    fn save_user(&self, session_no: &str, user: &User) -> BackendResult<SaveAck>;
}
