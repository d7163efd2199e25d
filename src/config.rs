//! Configuration for the spell checker.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LexitreeError, Result};
use crate::spelling::tree::DEFAULT_TOLERANCE;

/// Sentinel returned by an uninitialized spell checker.
pub const DEFAULT_NOT_INITIALIZED_MESSAGE: &str = "Spell checker not initialized";

/// Sentinel returned when a query has no matches.
pub const DEFAULT_NO_MATCH_MESSAGE: &str = "Not a Word";

/// Configuration for [`crate::spelling::SpellChecker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellConfig {
    /// Line-delimited dictionary used for rebuilds.
    pub dictionary_path: PathBuf,
    /// Durable snapshot location.
    pub snapshot_path: PathBuf,
    /// Maximum edit distance for suggestions.
    pub tolerance: usize,
    /// Suggestion returned before the index is loaded.
    pub not_initialized_message: String,
    /// Suggestion returned when nothing matches.
    pub no_match_message: String,
}

impl Default for SpellConfig {
    fn default() -> Self {
        SpellConfig {
            dictionary_path: PathBuf::from("words.txt"),
            snapshot_path: PathBuf::from("words.bktree"),
            tolerance: DEFAULT_TOLERANCE,
            not_initialized_message: DEFAULT_NOT_INITIALIZED_MESSAGE.to_string(),
            no_match_message: DEFAULT_NO_MATCH_MESSAGE.to_string(),
        }
    }
}

impl SpellConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            LexitreeError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: SpellConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty paths and empty sentinel messages.
    pub fn validate(&self) -> Result<()> {
        if self.dictionary_path.as_os_str().is_empty() {
            return Err(LexitreeError::config("dictionary_path must not be empty"));
        }
        if self.snapshot_path.as_os_str().is_empty() {
            return Err(LexitreeError::config("snapshot_path must not be empty"));
        }
        if self.not_initialized_message.is_empty() || self.no_match_message.is_empty() {
            return Err(LexitreeError::config("sentinel messages must not be empty"));
        }
        Ok(())
    }
}
