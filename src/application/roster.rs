use tracing::{debug, info, warn};
use crate::domain::{BackendResult, User};

/// Users registered to the current session, as last read from the backend.
#[derive(Debug, Default)]
pub struct RosterStore {
    session_no: Option<String>,
    users: Vec<User>,
}

impl RosterStore {
    /// Points the store at a new session, dropping the previous roster.
    pub fn reset(&mut self, session_no: &str) {
        self.session_no = Some(session_no.to_string());
        self.users.clear();
    }

    /// The session a refresh should re-read.
    pub fn session_no(&self) -> Option<&str> {
        self.session_no.as_deref()
    }

    /// Applies a fetch result. A roster replaces the held one wholesale;
    /// `None` and failures keep what is already shown.
    pub fn apply(&mut self, result: BackendResult<Option<Vec<User>>>) {
        match result {
            Ok(Some(users)) => {
                info!(count = users.len(), "roster replaced");
                self.users = users;
            }
            Ok(None) => debug!("backend returned no roster"),
            Err(err) => warn!(error = %err, "roster fetch failed"),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BackendError;

    fn user(name: &str) -> User {
        User {
            name: name.to_string(),
            age: String::new(),
            contact: String::new(),
            role: String::new(),
            location: None,
            custom_responses: Default::default(),
        }
    }

    #[test]
    fn test_apply_replaces_wholesale() {
        let mut store = RosterStore::default();
        store.reset("ABC");
        store.apply(Ok(Some(vec![user("a"), user("b")])));
        store.apply(Ok(Some(vec![user("c")])));

        let names: Vec<_> = store.users().iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["c"]);
    }

    #[test]
    fn test_apply_none_keeps_roster() {
        let mut store = RosterStore::default();
        store.apply(Ok(Some(vec![user("a")])));
        store.apply(Ok(None));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_apply_error_keeps_roster() {
        let mut store = RosterStore::default();
        store.apply(Ok(Some(vec![user("a")])));
        store.apply(Err(BackendError::transport("timed out")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reset_switches_session() {
        let mut store = RosterStore::default();
        store.reset("ABC");
        store.apply(Ok(Some(vec![user("a")])));

        store.reset("XYZ");

        assert_eq!(store.session_no(), Some("XYZ"));
        assert!(store.is_empty());
    }
}
