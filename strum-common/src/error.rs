//! Shared error type for the STRUM services
//!
//! Covers the concerns this crate owns: configuration loading and the
//! filesystem preparation around the root data folder. Service-specific
//! errors live in each service crate.

use thiserror::Error;

/// Result alias for shared-crate operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Root folder or database path could not be prepared
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
