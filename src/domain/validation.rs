//! Submit-time validation of a registration draft.

use std::collections::BTreeMap;
use crate::domain::RegistrationDraft;

pub const NAME_REQUIRED: &str = "please fill out your name!";
pub const LOCATION_REQUIRED: &str = "please select a location!";
pub const LOCATION_FORMAT: &str = "please enter a location as lat, lng!";

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Name,
    Location,
}

/// Validation messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    messages: BTreeMap<FieldKey, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, message: impl Into<String>) {
        self.messages.insert(key, message.into());
    }

    pub fn clear_field(&mut self, key: FieldKey) {
        self.messages.remove(&key);
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.messages.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.messages.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Checks the draft against the submit rules.
///
/// Only failing fields appear in the result; an empty result means the
/// draft may be submitted.
pub fn validate(draft: &RegistrationDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if draft.name.trim().is_empty() {
        errors.insert(FieldKey::Name, NAME_REQUIRED);
    }
    if draft.location.is_none() {
        errors.insert(FieldKey::Location, LOCATION_REQUIRED);
    }
    errors
}
