//! # STRUM Common Library
//!
//! Shared code for the STRUM services including:
//! - Common error type
//! - TOML + environment configuration loading
//! - Root folder and database path resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
