//! Application layer running the registration workflow.
//!
//! This module coordinates between the domain layer and presentation layer:
//! it loads the session, keeps the roster current, validates and submits the
//! draft, and moves backend calls off the event loop.

pub mod session_loader;
pub mod roster;
pub mod submission;
pub mod tasks;
pub mod state;

pub use session_loader::*;
pub use roster::*;
pub use submission::*;
pub use tasks::*;
pub use state::*;
