//! Application state for the session view.
//!
//! [`App`] owns everything the terminal loop renders and composes the
//! session loader, roster store, draft and submission controller. Backend
//! work is handed to a [`TaskSpawner`] and its results come back as
//! [`WorkflowEvent`]s through [`App::process_pending_events`].

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use crate::application::{
    LoadState, RosterStore, SessionLoader, SubmissionController, SubmitOutcome, TaskSpawner, ViewId,
    WorkflowEvent,
};
use crate::config::AppConfig;
use crate::domain::{
    FieldKey, Location, MapBackend, RegistrationDraft, Session, ValidationErrors, LOCATION_FORMAT,
};

pub const SAVED_MESSAGE: &str = "user saved!";

/// Represents the current input mode of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Field selection and shortcuts
    Normal,
    /// Typing into the selected form field
    Editing,
    /// Help screen is displayed
    Help,
    /// Roster CSV export dialog is open
    ExportRoster,
}

/// Palette used for the map and roster panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStyle {
    DefaultLight,
    DefaultDark,
}

impl MapStyle {
    pub fn toggled(self) -> Self {
        match self {
            MapStyle::DefaultLight => MapStyle::DefaultDark,
            MapStyle::DefaultDark => MapStyle::DefaultLight,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapStyle::DefaultLight => "default-light",
            MapStyle::DefaultDark => "default-dark",
        }
    }
}

/// One row of the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Name,
    Age,
    Contact,
    Role,
    Location,
    /// A question defined by the session's map document.
    Custom(String),
}

impl FormField {
    pub fn label(&self) -> &str {
        match self {
            FormField::Name => "name",
            FormField::Age => "age",
            FormField::Contact => "contact",
            FormField::Role => "role",
            FormField::Location => "location (lat, lng)",
            FormField::Custom(name) => name.as_str(),
        }
    }

    pub fn error_key(&self) -> Option<FieldKey> {
        match self {
            FormField::Name => Some(FieldKey::Name),
            FormField::Location => Some(FieldKey::Location),
            _ => None,
        }
    }
}

/// State of one session view.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pinmap::application::App;
/// use pinmap::config::{parse_base_url, AppConfig};
/// use pinmap::infrastructure::HttpBackend;
///
/// let config = AppConfig {
///     api_base_url: parse_base_url("http://localhost:3000").unwrap(),
///     request_timeout: std::time::Duration::from_secs(5),
///     refresh_delay: std::time::Duration::from_millis(300),
/// };
/// let backend = HttpBackend::new(config.api_base_url.clone(), config.request_timeout).unwrap();
/// let app = App::new(config, Arc::new(backend));
/// assert!(!app.is_saving());
/// assert!(app.draft.name.is_empty());
/// ```
pub struct App {
    pub config: AppConfig,
    pub loader: SessionLoader,
    pub roster: RosterStore,
    pub draft: RegistrationDraft,
    pub errors: ValidationErrors,
    pub submission: SubmissionController,
    /// Current input mode
    pub mode: AppMode,
    /// Index into [`App::form_fields`]
    pub selected_field: usize,
    /// Edit buffer for the selected field
    pub input: String,
    /// Cursor position in characters within the active buffer
    pub cursor_position: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Input buffer for the export filename
    pub filename_input: String,
    pub map_style: MapStyle,
    pub help_scroll: usize,
    pub roster_scroll: usize,
    view: ViewId,
    tasks: TaskSpawner,
    events: Receiver<WorkflowEvent>,
}

impl App {
    pub fn new(config: AppConfig, backend: Arc<dyn MapBackend>) -> Self {
        let (sender, events) = mpsc::channel();
        let tasks = TaskSpawner::new(backend, sender, config.refresh_delay);
        Self {
            config,
            loader: SessionLoader::default(),
            roster: RosterStore::default(),
            draft: RegistrationDraft::default(),
            errors: ValidationErrors::new(),
            submission: SubmissionController::default(),
            mode: AppMode::Normal,
            selected_field: 0,
            input: String::new(),
            cursor_position: 0,
            status_message: None,
            filename_input: String::new(),
            map_style: MapStyle::DefaultLight,
            help_scroll: 0,
            roster_scroll: 0,
            view: 0,
            tasks,
            events,
        }
    }

    /// Navigates to a session view.
    ///
    /// Opening a different code starts a fresh view: the draft, errors and
    /// guard are reset, and the session lookup and roster fetch are issued
    /// concurrently. Re-opening the code already shown does nothing.
    pub fn open_session(&mut self, session_no: &str) {
        let already_open = self.loader.session_no() == Some(session_no) && !self.loader.is_not_found();
        if already_open {
            return;
        }

        self.view += 1;
        self.draft.clear();
        self.errors = ValidationErrors::new();
        self.submission.finish();
        self.mode = AppMode::Normal;
        self.selected_field = 0;
        self.input.clear();
        self.cursor_position = 0;
        self.status_message = None;
        self.roster_scroll = 0;
        self.roster.reset(session_no);

        if self.loader.begin(session_no) {
            self.tasks.load_session(self.view, session_no);
            self.tasks.fetch_roster(self.view, session_no);
        }
    }

    /// Applies every result that has arrived, without blocking.
    pub fn process_pending_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return handled,
            }
        }
    }

    /// Waits up to `timeout` for a result, then applies anything pending.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.events.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_event(event);
                self.process_pending_events();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    pub fn handle_event(&mut self, event: WorkflowEvent) {
        if event.view() != self.view {
            debug!(event_view = event.view(), current_view = self.view, "dropping result for abandoned view");
            return;
        }
        match event {
            WorkflowEvent::SessionLoaded { result, .. } => {
                self.loader.resolve(result);
                self.clamp_selected_field();
            }
            WorkflowEvent::RosterFetched { result, .. } => {
                self.roster.apply(result);
                self.roster_scroll = self.roster_scroll.min(self.roster.len().saturating_sub(1));
            }
            WorkflowEvent::SaveSucceeded { .. } => {
                info!("user saved");
                self.status_message = Some(SAVED_MESSAGE.to_string());
            }
            WorkflowEvent::SaveFailed { message, .. } => {
                self.status_message = Some(format!("something broke: {} :(", message));
            }
            WorkflowEvent::SubmitFinished { .. } => {
                self.submission.finish();
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.loader.session()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.loader.state, LoadState::Idle) || self.loader.is_loading()
    }

    pub fn is_not_found(&self) -> bool {
        self.loader.is_not_found()
    }

    pub fn is_saving(&self) -> bool {
        self.submission.is_in_flight()
    }

    /// Form rows: the fixed schema followed by the session's custom fields.
    pub fn form_fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Name,
            FormField::Age,
            FormField::Contact,
            FormField::Role,
            FormField::Location,
        ];
        if let Some(session) = self.session() {
            fields.extend(
                session
                    .custom_fields
                    .iter()
                    .map(|field| FormField::Custom(field.field_name.clone())),
            );
        }
        fields
    }

    pub fn selected_form_field(&self) -> Option<FormField> {
        self.form_fields().into_iter().nth(self.selected_field)
    }

    pub fn select_next_field(&mut self) {
        if self.selected_field + 1 < self.form_fields().len() {
            self.selected_field += 1;
        }
    }

    pub fn select_previous_field(&mut self) {
        self.selected_field = self.selected_field.saturating_sub(1);
    }

    fn clamp_selected_field(&mut self) {
        let last = self.form_fields().len().saturating_sub(1);
        self.selected_field = self.selected_field.min(last);
    }

    /// Current draft value of a field, as shown in the form.
    pub fn field_value(&self, field: &FormField) -> String {
        match field {
            FormField::Location => self.draft.location.map(|l| l.to_string()).unwrap_or_default(),
            _ => self.field_input(field),
        }
    }

    /// Draft value loaded into the edit buffer; the location is not rounded.
    fn field_input(&self, field: &FormField) -> String {
        match field {
            FormField::Name => self.draft.name.clone(),
            FormField::Age => self.draft.age.clone(),
            FormField::Contact => self.draft.contact.clone(),
            FormField::Role => self.draft.role.clone(),
            FormField::Location => self.draft.location.map(|l| l.to_input_string()).unwrap_or_default(),
            FormField::Custom(name) => self.draft.custom_responses.get(name).unwrap_or_default().to_string(),
        }
    }

    /// Switches to editing the selected field, loading its value into the buffer.
    pub fn start_editing(&mut self) {
        if self.session().is_none() {
            return;
        }
        let Some(field) = self.selected_form_field() else {
            return;
        };
        self.input = self.field_input(&field);
        self.cursor_position = self.input.chars().count();
        self.mode = AppMode::Editing;
    }

    /// Commits the edit buffer to the draft and returns to normal mode.
    pub fn finish_editing(&mut self) {
        if let Some(field) = self.selected_form_field() {
            let value = std::mem::take(&mut self.input);
            self.commit_field(&field, &value);
        }
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Writes a value into the draft through the matching setter.
    ///
    /// Committing the name or a parsable location clears that field's stale
    /// error. Location text that does not parse clears the location and
    /// records a format error.
    pub fn commit_field(&mut self, field: &FormField, value: &str) {
        match field {
            FormField::Name => {
                self.draft.set_name(value);
                self.errors.clear_field(FieldKey::Name);
            }
            FormField::Age => self.draft.set_age(value),
            FormField::Contact => self.draft.set_contact(value),
            FormField::Role => self.draft.set_role(value),
            FormField::Location => {
                if value.trim().is_empty() {
                    self.draft.set_location(None);
                    return;
                }
                match Location::parse(value) {
                    Some(location) => {
                        self.draft.set_location(Some(location));
                        self.errors.clear_field(FieldKey::Location);
                    }
                    None => {
                        self.draft.set_location(None);
                        self.errors.insert(FieldKey::Location, LOCATION_FORMAT);
                    }
                }
            }
            FormField::Custom(name) => self.draft.set_custom_response(name, value),
        }
    }

    /// Pins the participant: validate, then persist in the background.
    ///
    /// A press while a save is in flight is a no-op.
    pub fn submit(&mut self) {
        let Some(session_no) = self.session().map(|s| s.session_no.clone()) else {
            return;
        };
        match self.submission.begin(&self.draft, &mut self.errors) {
            SubmitOutcome::Ignored => {}
            SubmitOutcome::Invalid => {
                self.status_message = None;
            }
            SubmitOutcome::Started(user) => {
                self.status_message = Some("saving...".to_string());
                self.tasks.submit(self.view, &session_no, user);
            }
        }
    }

    /// Re-reads the roster for the last known session.
    pub fn refresh_roster(&mut self) {
        if let Some(session_no) = self.roster.session_no() {
            self.tasks.fetch_roster(self.view, session_no);
        }
    }

    pub fn toggle_map_style(&mut self) {
        self.map_style = self.map_style.toggled();
    }

    pub fn scroll_roster_down(&mut self) {
        if self.roster_scroll + 1 < self.roster.len() {
            self.roster_scroll += 1;
        }
    }

    pub fn scroll_roster_up(&mut self) {
        self.roster_scroll = self.roster_scroll.saturating_sub(1);
    }

    pub fn session_code(&self) -> Option<&str> {
        self.loader.session_no()
    }

    pub fn start_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    /// Opens the export dialog with a default filename for this session.
    pub fn start_roster_export(&mut self) {
        if self.session().is_none() {
            return;
        }
        self.mode = AppMode::ExportRoster;
        self.filename_input = self.default_export_filename();
        self.cursor_position = self.filename_input.chars().count();
        self.status_message = None;
    }

    fn default_export_filename(&self) -> String {
        format!("roster-{}.csv", self.session_code().unwrap_or("session"))
    }

    /// Filename to export to: the typed one, or the default if blank.
    pub fn get_export_filename(&self) -> String {
        if self.filename_input.trim().is_empty() {
            self.default_export_filename()
        } else {
            self.filename_input.clone()
        }
    }

    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    pub fn set_export_result(&mut self, result: Result<String, String>) {
        self.status_message = Some(match result {
            Ok(filename) => format!("Exported roster to {}", filename),
            Err(error) => format!("Export failed: {}", error),
        });
        self.cancel_filename_input();
    }

    pub fn set_clipboard_result(&mut self, result: Result<(), String>) {
        self.status_message = Some(match result {
            Ok(()) => format!("Copied session code {}", self.session_code().unwrap_or_default()),
            Err(error) => format!("Copy failed: {}", error),
        });
    }
}
