//! Owned spell checker with a total suggestion API.
//!
//! The checker starts uninitialized, is loaded once from a snapshot or a
//! dictionary, and can be unloaded again. Suggestion lookups never fail:
//! an uninitialized checker or a query without matches answers with a
//! single sentinel string from the configuration.

use log::{debug, info};

use crate::config::SpellConfig;
use crate::error::{LexitreeError, Result};
use crate::spelling::dictionary::DictionarySource;
use crate::spelling::index::SpellIndex;
use crate::spelling::levenshtein::{DistanceMetric, Levenshtein};
use crate::storage::{LoadReport, SnapshotStore};

/// Spell checker owning an optional index and its snapshot store.
#[derive(Debug)]
pub struct SpellChecker<M = Levenshtein> {
    config: SpellConfig,
    store: SnapshotStore,
    metric: M,
    index: Option<SpellIndex<M>>,
}

impl SpellChecker<Levenshtein> {
    /// Create an uninitialized checker using Levenshtein distance.
    pub fn new(config: SpellConfig) -> Self {
        SpellChecker::with_metric(config, Levenshtein)
    }
}

impl<M> SpellChecker<M>
where
    M: DistanceMetric + Clone,
{
    /// Create an uninitialized checker with a custom metric.
    ///
    /// The metric must match the one existing snapshots were built with.
    pub fn with_metric(config: SpellConfig, metric: M) -> Self {
        let store = SnapshotStore::new(&config.snapshot_path);
        SpellChecker {
            config,
            store,
            metric,
            index: None,
        }
    }

    /// Load the snapshot or rebuild from `dictionary`, replacing any index
    /// already held.
    pub fn load<D>(&mut self, dictionary: &D) -> LoadReport
    where
        D: DictionarySource + ?Sized,
    {
        let (tree, report) = self
            .store
            .load_with_report(dictionary, self.metric.clone());
        info!("Spell checker loaded with {} words", tree.total_words());
        self.index = Some(SpellIndex::from_tree(tree));
        report
    }

    /// Rebuild from `dictionary`, ignoring any snapshot, and persist.
    pub fn rebuild<D>(&mut self, dictionary: &D) -> LoadReport
    where
        D: DictionarySource + ?Sized,
    {
        let (tree, report) = self.store.rebuild(dictionary, self.metric.clone());
        self.index = Some(SpellIndex::from_tree(tree));
        report
    }

    /// Whether a load or rebuild has completed.
    pub fn is_initialized(&self) -> bool {
        self.index.is_some()
    }

    /// Suggestions for `word`, or a single sentinel.
    pub fn suggest_word(&self, word: &str) -> Vec<String> {
        let Some(index) = &self.index else {
            return vec![self.config.not_initialized_message.clone()];
        };

        let suggestions = index.suggest_within(word, self.config.tolerance);
        if suggestions.is_empty() {
            debug!("No suggestions for {word:?}");
            vec![self.config.no_match_message.clone()]
        } else {
            suggestions
        }
    }

    /// Whether `suggestions` is one of the configured sentinels.
    pub fn is_sentinel(&self, suggestions: &[String]) -> bool {
        match suggestions {
            [only] => {
                *only == self.config.not_initialized_message
                    || *only == self.config.no_match_message
            }
            _ => false,
        }
    }

    /// Number of indexed words; zero when uninitialized.
    pub fn total_words(&self) -> usize {
        self.index.as_ref().map_or(0, SpellIndex::total_words)
    }

    /// Drop every indexed word but stay initialized.
    pub fn clear(&mut self) {
        if let Some(index) = &mut self.index {
            index.clear();
        }
    }

    /// Write the current index to the snapshot path.
    pub fn persist(&self) -> Result<()> {
        let index = self.index.as_ref().ok_or(LexitreeError::NotInitialized)?;
        self.store.save(index.tree())
    }

    /// Release the index and return to the uninitialized state.
    pub fn unload(&mut self) -> Option<SpellIndex<M>> {
        self.index.take()
    }

    /// The loaded index, if any.
    pub fn index(&self) -> Option<&SpellIndex<M>> {
        self.index.as_ref()
    }

    /// Active configuration.
    pub fn config(&self) -> &SpellConfig {
        &self.config
    }

    /// Snapshot store backing this checker.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }
}
