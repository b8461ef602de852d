//! Shared types and error definitions for the trading engine.

pub mod error;
pub mod types;

pub use error::Error;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
