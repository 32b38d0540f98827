//! Shared fixtures for unit tests: an in-memory backend and helpers for
//! driving the event loop.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use crate::application::App;
use crate::config::{parse_base_url, AppConfig};
use crate::domain::{BackendError, BackendResult, Location, MapBackend, SaveAck, Session, User};

pub(crate) fn sample_user(name: &str) -> User {
    User {
        name: name.to_string(),
        age: "30".to_string(),
        contact: format!("{}@example.com", name.to_lowercase()),
        role: "member".to_string(),
        location: Location::new(40.0, -70.0),
        custom_responses: Default::default(),
    }
}

pub(crate) fn test_config(refresh_delay: Duration) -> AppConfig {
    AppConfig {
        api_base_url: parse_base_url("http://localhost:3000").unwrap(),
        request_timeout: Duration::from_secs(1),
        refresh_delay,
    }
}

/// Drains workflow events until `done` holds or the timeout passes.
pub(crate) fn drive_until(app: &mut App, timeout: Duration, done: impl Fn(&App) -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while !done(app) {
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        app.wait_for_event(deadline - now);
    }
    true
}

/// Holds saves until opened.
#[derive(Default)]
pub(crate) struct SaveGate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl SaveGate {
    pub(crate) fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.cv.notify_all();
    }

    fn wait(&self) {
        let guard = self.open.lock().unwrap();
        let _open = self
            .cv
            .wait_timeout_while(guard, Duration::from_secs(10), |open| !*open)
            .unwrap();
    }
}

#[derive(Default)]
pub(crate) struct CallLog {
    pub sessions: Vec<String>,
    pub fetch_users: Vec<(String, Instant)>,
    pub saves: Vec<(String, User, Instant)>,
}

impl CallLog {
    fn total(&self) -> usize {
        self.sessions.len() + self.fetch_users.len() + self.saves.len()
    }
}

/// In-memory backend. Saved users are appended to the roster it serves.
pub(crate) struct FakeBackend {
    session_error: Option<BackendError>,
    custom_fields: Vec<&'static str>,
    roster: Mutex<Vec<User>>,
    roster_missing: bool,
    save_error: Option<BackendError>,
    save_ack: SaveAck,
    gate: Option<Arc<SaveGate>>,
    log: Mutex<CallLog>,
    changed: Condvar,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self {
            session_error: None,
            custom_fields: Vec::new(),
            roster: Mutex::new(Vec::new()),
            roster_missing: false,
            save_error: None,
            save_ack: SaveAck::Accepted,
            gate: None,
            log: Mutex::new(CallLog::default()),
            changed: Condvar::new(),
        }
    }

    pub(crate) fn missing_session(mut self) -> Self {
        self.session_error = Some(BackendError::NotFound { session_no: "missing".to_string() });
        self
    }

    pub(crate) fn with_custom_fields(mut self, names: &[&'static str]) -> Self {
        self.custom_fields = names.to_vec();
        self
    }

    pub(crate) fn with_roster(self, users: Vec<User>) -> Self {
        *self.roster.lock().unwrap() = users;
        self
    }

    pub(crate) fn without_roster(mut self) -> Self {
        self.roster_missing = true;
        self
    }

    pub(crate) fn failing_save(mut self, message: &str) -> Self {
        self.save_error = Some(BackendError::rejected(message));
        self
    }

    pub(crate) fn committing_saves(mut self) -> Self {
        self.save_ack = SaveAck::Committed;
        self
    }

    pub(crate) fn gated_saves(mut self) -> (Self, Arc<SaveGate>) {
        let gate = Arc::new(SaveGate::default());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub(crate) fn log(&self) -> MutexGuard<'_, CallLog> {
        self.log.lock().unwrap()
    }

    pub(crate) fn save_count(&self) -> usize {
        self.log().saves.len()
    }

    pub(crate) fn fetch_users_count(&self) -> usize {
        self.log().fetch_users.len()
    }

    pub(crate) fn session_fetch_count(&self) -> usize {
        self.log().sessions.len()
    }

    /// Blocks until at least `count` backend calls have started.
    pub(crate) fn wait_for_calls(&self, count: usize, timeout: Duration) -> bool {
        let guard = self.log.lock().unwrap();
        let (guard, _) = self
            .changed
            .wait_timeout_while(guard, timeout, |log| log.total() < count)
            .unwrap();
        guard.total() >= count
    }

    fn record(&self, update: impl FnOnce(&mut CallLog)) {
        update(&mut self.log.lock().unwrap());
        self.changed.notify_all();
    }
}

impl MapBackend for FakeBackend {
    fn fetch_session(&self, session_no: &str) -> BackendResult<Session> {
        self.record(|log| log.sessions.push(session_no.to_string()));
        match &self.session_error {
            Some(err) => Err(err.clone()),
            None => Ok(Session::new(session_no, "campus", "robotics club").with_custom_fields(&self.custom_fields)),
        }
    }

    fn fetch_users(&self, session_no: &str) -> BackendResult<Option<Vec<User>>> {
        self.record(|log| log.fetch_users.push((session_no.to_string(), Instant::now())));
        if self.roster_missing {
            return Ok(None);
        }
        Ok(Some(self.roster.lock().unwrap().clone()))
    }

    fn save_user(&self, session_no: &str, user: &User) -> BackendResult<SaveAck> {
        self.record(|log| log.saves.push((session_no.to_string(), user.clone(), Instant::now())));
        if let Some(gate) = &self.gate {
            gate.wait();
        }
        match &self.save_error {
            Some(err) => Err(err.clone()),
            None => {
                self.roster.lock().unwrap().push(user.clone());
                Ok(self.save_ack)
            }
        }
    }
}
