//! Presentation layer handling terminal UI and user input.
//!
//! Renders the session view with ratatui and maps key presses onto
//! [`crate::application::App`] operations.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
