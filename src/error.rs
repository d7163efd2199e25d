//! Error types for the Lexitree library.
//!
//! All fallible operations return [`LexitreeError`] through the crate-wide
//! [`Result`] alias. Most of these errors never reach the caller of the
//! suggestion API: snapshot read failures trigger a rebuild, dictionary read
//! failures degrade to an empty index, and an uninitialized checker answers
//! with a sentinel suggestion.
//!
//! # Examples
//!
//! ```
//! use lexitree::error::{LexitreeError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LexitreeError::snapshot_read("bad magic"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Lexitree operations.
#[derive(Error, Debug)]
pub enum LexitreeError {
    /// The index was used before a load or build completed.
    #[error("Spell index not initialized")]
    NotInitialized,

    /// Snapshot missing, unreadable, or in an unrecognized format.
    #[error("Snapshot read error: {0}")]
    SnapshotRead(String),

    /// Snapshot could not be persisted.
    #[error("Snapshot write error: {0}")]
    SnapshotWrite(String),

    /// Dictionary source unavailable or only partially readable.
    #[error("Dictionary read error: {0}")]
    DictionaryRead(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with LexitreeError.
pub type Result<T> = std::result::Result<T, LexitreeError>;

impl LexitreeError {
    /// Create a new snapshot read error.
    pub fn snapshot_read<S: Into<String>>(msg: S) -> Self {
        LexitreeError::SnapshotRead(msg.into())
    }

    /// Create a new snapshot write error.
    pub fn snapshot_write<S: Into<String>>(msg: S) -> Self {
        LexitreeError::SnapshotWrite(msg.into())
    }

    /// Create a new dictionary read error.
    pub fn dictionary_read<S: Into<String>>(msg: S) -> Self {
        LexitreeError::DictionaryRead(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        LexitreeError::Config(msg.into())
    }
}
