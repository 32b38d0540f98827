//! pinmap - join a session's shared map from the terminal
//!
//! Loads a map session by code, shows who is already pinned on it, and
//! registers the participant through a validated form.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;
pub mod config;

#[cfg(test)]
mod test_support;

pub use domain::*;
pub use application::*;
