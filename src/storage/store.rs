//! Load-or-rebuild persistence for the spelling index.
//!
//! [`SnapshotStore::load`] never fails: a missing, unreadable, or
//! unrecognized snapshot falls through to a rebuild from the dictionary
//! source, and the rebuilt tree is written back as a fresh snapshot.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::error::{LexitreeError, Result};
use crate::spelling::dictionary::DictionarySource;
use crate::spelling::levenshtein::DistanceMetric;
use crate::spelling::tree::{MetricTree, TreeStructure};
use crate::storage::file::{ReplaceMode, write_atomic};
use crate::storage::snapshot;

/// Why the tree was rebuilt from the dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildReason {
    /// No snapshot file at the durable path.
    MissingSnapshot,
    /// The snapshot could not be read or decoded.
    InvalidSnapshot(String),
    /// The caller asked for a rebuild.
    Requested,
}

impl fmt::Display for RebuildReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RebuildReason::MissingSnapshot => f.write_str("snapshot missing"),
            RebuildReason::InvalidSnapshot(reason) => write!(f, "snapshot invalid: {reason}"),
            RebuildReason::Requested => f.write_str("rebuild requested"),
        }
    }
}

/// Where a loaded tree came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Snapshot,
    Rebuilt(RebuildReason),
}

/// Outcome of a load or rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub source: LoadSource,
    pub word_count: usize,
    /// Whether a fresh snapshot was written during this load.
    pub persisted: bool,
    /// Set when the dictionary could not be read and the index is empty.
    pub dictionary_error: Option<String>,
}

impl LoadReport {
    /// Whether the tree was restored from the snapshot.
    pub fn from_snapshot(&self) -> bool {
        self.source == LoadSource::Snapshot
    }
}

/// Durable snapshot of a metric tree at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store for the snapshot at `path`. Nothing is read or written.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SnapshotStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Durable snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot file is present.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the snapshot, or rebuild from `dictionary` if that fails.
    pub fn load<D, M>(&self, dictionary: &D, metric: M) -> MetricTree<M>
    where
        D: DictionarySource + ?Sized,
        M: DistanceMetric,
    {
        self.load_with_report(dictionary, metric).0
    }

    /// Same as [`SnapshotStore::load`], also reporting where the tree came from.
    pub fn load_with_report<D, M>(&self, dictionary: &D, metric: M) -> (MetricTree<M>, LoadReport)
    where
        D: DictionarySource + ?Sized,
        M: DistanceMetric,
    {
        debug!("Looking for snapshot at {}", self.path.display());

        if !self.exists() {
            debug!("Snapshot not found, building from {}", dictionary.describe());
            return self.rebuild_with_reason(dictionary, metric, RebuildReason::MissingSnapshot);
        }

        match self.read_structure() {
            Ok(structure) => {
                let tree = MetricTree::from_structure(structure, metric);
                debug!(
                    "Loaded snapshot {} with {} words",
                    self.path.display(),
                    tree.total_words()
                );
                let report = LoadReport {
                    source: LoadSource::Snapshot,
                    word_count: tree.total_words(),
                    persisted: false,
                    dictionary_error: None,
                };
                (tree, report)
            }
            Err(e) => {
                warn!(
                    "Snapshot {} is unusable, rebuilding: {e}",
                    self.path.display()
                );
                self.rebuild_with_reason(
                    dictionary,
                    metric,
                    RebuildReason::InvalidSnapshot(e.to_string()),
                )
            }
        }
    }

    /// Read and decode the snapshot without binding a metric.
    pub fn read_structure(&self) -> Result<TreeStructure> {
        let bytes = fs::read(&self.path).map_err(|e| {
            LexitreeError::snapshot_read(format!("failed to read {}: {e}", self.path.display()))
        })?;
        Ok(snapshot::decode(&bytes)?.structure)
    }

    /// Read the snapshot and bind `metric` to it. No fallback.
    pub fn read<M: DistanceMetric>(&self, metric: M) -> Result<MetricTree<M>> {
        Ok(MetricTree::from_structure(self.read_structure()?, metric))
    }

    /// Rebuild from `dictionary` regardless of the snapshot, then persist.
    pub fn rebuild<D, M>(&self, dictionary: &D, metric: M) -> (MetricTree<M>, LoadReport)
    where
        D: DictionarySource + ?Sized,
        M: DistanceMetric,
    {
        self.rebuild_with_reason(dictionary, metric, RebuildReason::Requested)
    }

    fn rebuild_with_reason<D, M>(
        &self,
        dictionary: &D,
        metric: M,
        reason: RebuildReason,
    ) -> (MetricTree<M>, LoadReport)
    where
        D: DictionarySource + ?Sized,
        M: DistanceMetric,
    {
        let (words, dictionary_error) = match dictionary.read_words() {
            Ok(words) => (words, None),
            Err(e) => {
                error!("Failed to read dictionary {}: {e}", dictionary.describe());
                (Vec::new(), Some(e.to_string()))
            }
        };

        let mut tree = MetricTree::new(metric);
        for word in &words {
            tree.insert(word);
        }

        // An empty tree from a broken dictionary is not written back, so the
        // next load retries the dictionary instead of trusting the snapshot.
        let persisted = if dictionary_error.is_some() {
            false
        } else {
            match self.save(&tree) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to persist rebuilt snapshot: {e}");
                    false
                }
            }
        };

        info!(
            "Spell index built from {} with {} words ({reason})",
            dictionary.describe(),
            tree.total_words()
        );

        let report = LoadReport {
            source: LoadSource::Rebuilt(reason),
            word_count: tree.total_words(),
            persisted,
            dictionary_error,
        };
        (tree, report)
    }

    /// Persist `tree`, replacing any existing snapshot only once the new one
    /// is fully written.
    pub fn save<M>(&self, tree: &MetricTree<M>) -> Result<()>
    where
        M: DistanceMetric,
    {
        let bytes = snapshot::encode(tree.structure())?;
        let mode = write_atomic(&self.path, &bytes)?;

        let via = match mode {
            ReplaceMode::Renamed => "rename",
            ReplaceMode::Copied => "copy",
        };
        debug!(
            "Wrote snapshot {} ({} bytes, {} words) via {via}",
            self.path.display(),
            bytes.len(),
            tree.total_words()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spelling::dictionary::{FileDictionary, MemoryDictionary};
    use crate::spelling::levenshtein::Levenshtein;
    use crate::storage::file::temp_path;
    use tempfile::TempDir;

    fn words() -> MemoryDictionary {
        MemoryDictionary::new(["cat", "cats", "bat", "bar"])
    }

    #[test]
    fn test_missing_snapshot_rebuilds_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("words.bktree"));
        assert!(!store.exists());

        let (tree, report) = store.load_with_report(&words(), Levenshtein);
        assert_eq!(tree.total_words(), 4);
        assert_eq!(
            report.source,
            LoadSource::Rebuilt(RebuildReason::MissingSnapshot)
        );
        assert!(report.persisted);
        assert!(store.exists());
        assert!(!temp_path(store.path()).exists());
    }

    #[test]
    fn test_second_load_uses_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("words.bktree"));
        store.load(&words(), Levenshtein);

        // A different dictionary proves the words came from the snapshot.
        let other = MemoryDictionary::new(["dog"]);
        let (tree, report) = store.load_with_report(&other, Levenshtein);
        assert!(report.from_snapshot());
        assert_eq!(tree.total_words(), 4);
        assert_eq!(tree.search("cet"), vec!["cat".to_string()]);
    }

    #[test]
    fn test_corrupt_snapshot_rebuilds() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("words.bktree"));
        fs::write(store.path(), b"definitely not a snapshot").unwrap();

        let (tree, report) = store.load_with_report(&words(), Levenshtein);
        assert_eq!(tree.total_words(), 4);
        assert!(matches!(
            report.source,
            LoadSource::Rebuilt(RebuildReason::InvalidSnapshot(_))
        ));
        assert!(report.persisted);

        // The rebuilt snapshot replaced the corrupt one.
        assert_eq!(store.read(Levenshtein).unwrap().total_words(), 4);
    }

    #[test]
    fn test_unreadable_dictionary_degrades_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("words.bktree"));
        let dictionary = FileDictionary::new(temp_dir.path().join("missing.txt"));

        let (tree, report) = store.load_with_report(&dictionary, Levenshtein);
        assert_eq!(tree.total_words(), 0);
        assert!(report.dictionary_error.is_some());
        assert!(!report.persisted);
        assert!(!store.exists());
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"file, not a directory").unwrap();
        let store = SnapshotStore::new(blocker.join("words.bktree"));

        let (tree, report) = store.load_with_report(&words(), Levenshtein);
        assert_eq!(tree.total_words(), 4);
        assert!(!report.persisted);
        assert!(store.save(&tree).is_err());
    }

    #[test]
    fn test_explicit_rebuild() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("words.bktree"));
        store.load(&words(), Levenshtein);

        let (tree, report) = store.rebuild(&MemoryDictionary::new(["dog", "dig"]), Levenshtein);
        assert_eq!(report.source, LoadSource::Rebuilt(RebuildReason::Requested));
        assert_eq!(tree.total_words(), 2);
        assert_eq!(store.read(Levenshtein).unwrap().total_words(), 2);
    }

    #[test]
    fn test_read_without_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("words.bktree"));
        assert!(matches!(
            store.read(Levenshtein),
            Err(LexitreeError::SnapshotRead(_))
        ));
    }
}
