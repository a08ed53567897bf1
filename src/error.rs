//! Error types for the cafescout library.
//!
//! The search, filter, ranking and recommendation functions never fail;
//! errors only come from the edges of the crate: storage, decoding of
//! persisted records, form validation and configuration.
//!
//! # Examples
//!
//! ```
//! use cafescout::error::{CafeScoutError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(CafeScoutError::validation("name is required"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for cafescout operations.
#[derive(Error, Debug)]
pub enum CafeScoutError {
    /// I/O errors (file-backed storage, config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Rejected user input (add café form, review form)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Unknown café, review or key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Location acquisition errors surfaced to the caller
    #[error("Location error: {0}")]
    Location(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with CafeScoutError.
pub type Result<T> = std::result::Result<T, CafeScoutError>;

impl CafeScoutError {
    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        CafeScoutError::Storage(msg.into())
    }

    /// Create a new validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        CafeScoutError::Validation(msg.into())
    }

    /// Create a new config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CafeScoutError::Config(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        CafeScoutError::NotFound(msg.into())
    }

    /// Create a new location error.
    pub fn location<S: Into<String>>(msg: S) -> Self {
        CafeScoutError::Location(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CafeScoutError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
