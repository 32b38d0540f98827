//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP backend adapter, roster export, clipboard
//! access and log output.

pub mod http;
pub mod export;
pub mod clipboard;
pub mod logging;

pub use http::*;
pub use export::*;
pub use clipboard::*;
pub use logging::*;
