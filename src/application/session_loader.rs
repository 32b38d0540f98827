use tracing::{info, warn};
use crate::domain::{BackendResult, Session};

/// Where the current view stands on resolving its session.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No session requested yet.
    Idle,
    Loading { session_no: String },
    Loaded(Session),
    /// Terminal for the view.
    NotFound { session_no: String },
}

/// Tracks the session lookup for the current view.
#[derive(Debug)]
pub struct SessionLoader {
    pub state: LoadState,
}

impl Default for SessionLoader {
    fn default() -> Self {
        Self { state: LoadState::Idle }
    }
}

impl SessionLoader {
    /// Starts loading `session_no`.
    ///
    /// Returns `false` when that session is already loading or loaded, in
    /// which case no fetch should be issued. An empty code resolves straight
    /// to not-found.
    pub fn begin(&mut self, session_no: &str) -> bool {
        if self.session_no() == Some(session_no) && !matches!(self.state, LoadState::NotFound { .. }) {
            return false;
        }
        if session_no.trim().is_empty() {
            warn!("empty session code");
            self.state = LoadState::NotFound { session_no: session_no.to_string() };
            return false;
        }
        info!(session_no, "loading session");
        self.state = LoadState::Loading { session_no: session_no.to_string() };
        true
    }

    /// Applies the lookup result. Any failure is treated as not-found.
    pub fn resolve(&mut self, result: BackendResult<Session>) {
        let LoadState::Loading { session_no } = &self.state else {
            return;
        };
        let session_no = session_no.clone();
        match result {
            Ok(session) => {
                info!(session_no = %session_no, map_name = %session.map_name, "session loaded");
                self.state = LoadState::Loaded(session);
            }
            Err(err) => {
                warn!(session_no = %session_no, error = %err, "session lookup failed");
                self.state = LoadState::NotFound { session_no };
            }
        }
    }

    pub fn session_no(&self) -> Option<&str> {
        match &self.state {
            LoadState::Idle => None,
            LoadState::Loading { session_no } | LoadState::NotFound { session_no } => Some(session_no),
            LoadState::Loaded(session) => Some(&session.session_no),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            LoadState::Loaded(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.state, LoadState::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BackendError;

    #[test]
    fn test_begin_sets_loading() {
        let mut loader = SessionLoader::default();
        assert!(loader.begin("ABC"));
        assert!(loader.is_loading());
        assert_eq!(loader.session_no(), Some("ABC"));
    }

    #[test]
    fn test_begin_same_session_is_noop() {
        let mut loader = SessionLoader::default();
        assert!(loader.begin("ABC"));
        assert!(!loader.begin("ABC"));

        loader.resolve(Ok(Session::new("ABC", "map", "group")));
        assert!(!loader.begin("ABC"));
        assert!(loader.session().is_some());
    }

    #[test]
    fn test_begin_different_session_reloads() {
        let mut loader = SessionLoader::default();
        loader.begin("ABC");
        loader.resolve(Ok(Session::new("ABC", "map", "group")));

        assert!(loader.begin("XYZ"));
        assert!(loader.is_loading());
        assert!(loader.session().is_none());
    }

    #[test]
    fn test_empty_code_is_not_found() {
        let mut loader = SessionLoader::default();
        assert!(!loader.begin("  "));
        assert!(loader.is_not_found());
    }

    #[test]
    fn test_any_failure_is_not_found() {
        for err in [
            BackendError::NotFound { session_no: "ABC".to_string() },
            BackendError::transport("connection refused"),
            BackendError::decode("expected object"),
        ] {
            let mut loader = SessionLoader::default();
            loader.begin("ABC");
            loader.resolve(Err(err));
            assert!(loader.is_not_found());
            assert_eq!(loader.session_no(), Some("ABC"));
        }
    }

    #[test]
    fn test_resolve_without_request_is_ignored() {
        let mut loader = SessionLoader::default();
        loader.resolve(Ok(Session::new("ABC", "map", "group")));
        assert_eq!(loader.state, LoadState::Idle);
    }
}
