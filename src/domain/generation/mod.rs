pub mod error;
pub mod prompts;
pub mod rotation;

pub use error::RotationError;
pub use rotation::{KeyRotator, RotatingGenerator};
