//! Background execution of backend calls.
//!
//! Each call runs on its own worker thread and reports back over a channel
//! that the terminal loop drains. Events carry the [`ViewId`] of the view
//! that issued them; a dropped receiver means nobody is waiting any more and
//! results are discarded.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use crate::domain::{BackendResult, MapBackend, SaveAck, Session, User};

/// Generation counter identifying one opened session view.
pub type ViewId = u64;

/// Results delivered from worker threads to the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    SessionLoaded { view: ViewId, result: BackendResult<Session> },
    RosterFetched { view: ViewId, result: BackendResult<Option<Vec<User>>> },
    SaveSucceeded { view: ViewId },
    SaveFailed { view: ViewId, message: String },
    /// Always the last event of a submission, whatever happened before it.
    SubmitFinished { view: ViewId },
}

impl WorkflowEvent {
    pub fn view(&self) -> ViewId {
        match self {
            WorkflowEvent::SessionLoaded { view, .. }
            | WorkflowEvent::RosterFetched { view, .. }
            | WorkflowEvent::SaveSucceeded { view }
            | WorkflowEvent::SaveFailed { view, .. }
            | WorkflowEvent::SubmitFinished { view } => *view,
        }
    }
}

/// Spawns backend calls and routes their results to the event loop.
#[derive(Clone)]
pub struct TaskSpawner {
    backend: Arc<dyn MapBackend>,
    events: Sender<WorkflowEvent>,
    refresh_delay: Duration,
}

impl TaskSpawner {
    pub fn new(backend: Arc<dyn MapBackend>, events: Sender<WorkflowEvent>, refresh_delay: Duration) -> Self {
        Self { backend, events, refresh_delay }
    }

    pub fn load_session(&self, view: ViewId, session_no: &str) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        let session_no = session_no.to_string();
        thread::spawn(move || {
            let result = backend.fetch_session(&session_no);
            send(&events, WorkflowEvent::SessionLoaded { view, result });
        });
    }

    pub fn fetch_roster(&self, view: ViewId, session_no: &str) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        let session_no = session_no.to_string();
        thread::spawn(move || {
            let result = backend.fetch_users(&session_no);
            send(&events, WorkflowEvent::RosterFetched { view, result });
        });
    }

    /// Saves `user`, then re-reads the roster once the write is visible.
    ///
    /// Event order: `SaveSucceeded`, `RosterFetched`, `SubmitFinished` on
    /// success; `SaveFailed`, `SubmitFinished` on failure.
    pub fn submit(&self, view: ViewId, session_no: &str, user: User) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        let session_no = session_no.to_string();
        let refresh_delay = self.refresh_delay;
        thread::spawn(move || {
            let _release = InFlightRelease { events: events.clone(), view };
            match backend.save_user(&session_no, &user) {
                Ok(ack) => {
                    send(&events, WorkflowEvent::SaveSucceeded { view });
                    if ack == SaveAck::Accepted && !refresh_delay.is_zero() {
                        thread::sleep(refresh_delay);
                    }
                    let result = backend.fetch_users(&session_no);
                    send(&events, WorkflowEvent::RosterFetched { view, result });
                }
                Err(err) => {
                    warn!(session_no = %session_no, error = %err, "save failed");
                    send(&events, WorkflowEvent::SaveFailed { view, message: err.message() });
                }
            }
        });
    }
}

/// Reports the end of a submission when dropped, so the in-flight guard is
/// released even if the worker unwinds.
struct InFlightRelease {
    events: Sender<WorkflowEvent>,
    view: ViewId,
}

impl Drop for InFlightRelease {
    fn drop(&mut self) {
        send(&self.events, WorkflowEvent::SubmitFinished { view: self.view });
    }
}

fn send(events: &Sender<WorkflowEvent>, event: WorkflowEvent) {
    if events.send(event).is_err() {
        debug!("event loop gone, dropping result");
    }
}
