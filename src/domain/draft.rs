//! The participant's in-progress registration.

use crate::domain::{CustomResponses, Location, User};

/// Unsaved form values for the current participant.
///
/// Created empty when a session view opens and cleared when the view
/// navigates to another session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationDraft {
    pub name: String,
    pub age: String,
    pub contact: String,
    pub role: String,
    pub location: Option<Location>,
    pub custom_responses: CustomResponses,
}

impl RegistrationDraft {
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_age(&mut self, age: impl Into<String>) {
        self.age = age.into();
    }

    pub fn set_contact(&mut self, contact: impl Into<String>) {
        self.contact = contact.into();
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.role = role.into();
    }

    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    /// Upserts a custom response by field name, keeping entry order.
    pub fn set_custom_response(&mut self, field_name: &str, value: impl Into<String>) {
        self.custom_responses.upsert(field_name, value);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The roster entry this draft becomes once saved.
    pub fn to_user(&self) -> User {
        User {
            name: self.name.clone(),
            age: self.age.clone(),
            contact: self.contact.clone(),
            role: self.role.clone(),
            location: self.location,
            custom_responses: self.custom_responses.clone(),
        }
    }
}
