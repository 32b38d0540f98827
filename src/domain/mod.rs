pub mod models;
pub mod draft;
pub mod validation;
pub mod ports;
pub mod errors;

pub use models::*;
pub use draft::*;
pub use validation::*;
pub use ports::*;
pub use errors::*;
