//! Submit-side state machine: guard, validate, hand off to persistence.

use tracing::{debug, info};
use crate::domain::{validate, RegistrationDraft, User, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    /// A save is in flight; further submits are ignored.
    Submitting,
}

/// What a submit attempt resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A save was already in flight. Nothing changed.
    Ignored,
    /// Validation failed; the errors now held by the caller describe why.
    Invalid,
    /// Validation passed and the user should be persisted.
    Started(User),
}

#[derive(Debug)]
pub struct SubmissionController {
    phase: SubmitPhase,
}

impl Default for SubmissionController {
    fn default() -> Self {
        Self { phase: SubmitPhase::Idle }
    }
}

impl SubmissionController {
    /// Runs the guard and validation for one submit press.
    ///
    /// `errors` is replaced with the result of this validation pass. On
    /// success the controller enters [`SubmitPhase::Submitting`] and stays
    /// there until [`finish`](Self::finish).
    pub fn begin(&mut self, draft: &RegistrationDraft, errors: &mut ValidationErrors) -> SubmitOutcome {
        if self.phase == SubmitPhase::Submitting {
            debug!("submit ignored, save already in flight");
            return SubmitOutcome::Ignored;
        }

        *errors = validate(draft);
        if !errors.is_empty() {
            debug!(failing = errors.len(), "submit blocked by validation");
            return SubmitOutcome::Invalid;
        }

        info!(name = %draft.name.trim(), "submitting registration");
        self.phase = SubmitPhase::Submitting;
        SubmitOutcome::Started(draft.to_user())
    }

    /// Releases the in-flight guard.
    pub fn finish(&mut self) {
        self.phase = SubmitPhase::Idle;
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }
}
