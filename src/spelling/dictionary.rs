//! Dictionary sources for building the spelling index.
//!
//! A dictionary is a sequence of line-delimited words. Each line is used
//! verbatim: only the line terminator is removed, so no trimming,
//! normalization, or deduplication happens here.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{LexitreeError, Result};

/// A source of dictionary words, consumed once per rebuild.
pub trait DictionarySource {
    /// Read every word in source order.
    ///
    /// A source that can only be partially read must fail rather than return
    /// the words read so far.
    fn read_words(&self) -> Result<Vec<String>>;

    /// Human-readable description used in log messages.
    fn describe(&self) -> String;
}

/// Read line-delimited words from any buffered reader.
pub fn read_words<R: BufRead>(reader: R) -> Result<Vec<String>> {
    reader
        .lines()
        .map(|line| line.map_err(|e| LexitreeError::dictionary_read(e.to_string())))
        .collect()
}

/// A dictionary stored as a text file with one word per line.
#[derive(Debug, Clone)]
pub struct FileDictionary {
    path: PathBuf,
}

impl FileDictionary {
    /// Create a dictionary backed by the given file.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileDictionary {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DictionarySource for FileDictionary {
    fn read_words(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path).map_err(|e| {
            LexitreeError::dictionary_read(format!(
                "failed to open {}: {e}",
                self.path.display()
            ))
        })?;

        read_words(BufReader::new(file)).map_err(|e| match e {
            LexitreeError::DictionaryRead(msg) => {
                LexitreeError::dictionary_read(format!("{}: {msg}", self.path.display()))
            }
            other => other,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory word list.
#[derive(Debug, Clone, Default)]
pub struct MemoryDictionary {
    words: Vec<String>,
}

impl MemoryDictionary {
    /// Create a dictionary from the given words.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemoryDictionary {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a block of text into one word per line.
    pub fn from_text(text: &str) -> Self {
        MemoryDictionary::new(text.lines())
    }
}

impl DictionarySource for MemoryDictionary {
    fn read_words(&self) -> Result<Vec<String>> {
        Ok(self.words.clone())
    }

    fn describe(&self) -> String {
        format!("<memory: {} words>", self.words.len())
    }
}
