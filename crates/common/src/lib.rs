//! Shared types and error definitions for the pump radar.

pub mod error;
pub mod types;

pub use error::Error;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
