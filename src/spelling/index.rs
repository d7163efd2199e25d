//! Thin suggestion facade over a [`MetricTree`].

use crate::spelling::levenshtein::{DistanceMetric, Levenshtein};
use crate::spelling::tree::{DEFAULT_TOLERANCE, MetricTree};

/// Spelling suggestions backed by a BK-tree.
#[derive(Debug)]
pub struct SpellIndex<M = Levenshtein> {
    tree: MetricTree<M>,
}

impl<M: DistanceMetric> SpellIndex<M> {
    /// Build a fresh index from a word sequence, inserting in order.
    ///
    /// Duplicate words are absorbed by the tree.
    pub fn build_from_words<I, S>(words: I, metric: M) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = MetricTree::new(metric);
        for word in words {
            tree.insert(word.as_ref());
        }
        SpellIndex { tree }
    }

    /// Wrap an already loaded tree.
    pub fn from_tree(tree: MetricTree<M>) -> Self {
        SpellIndex { tree }
    }

    /// Suggestions within edit distance 1.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        self.tree.search_within(word, DEFAULT_TOLERANCE)
    }

    /// Suggestions within the given edit distance.
    pub fn suggest_within(&self, word: &str, tolerance: usize) -> Vec<String> {
        self.tree.search_within(word, tolerance)
    }

    /// Number of indexed words.
    pub fn total_words(&self) -> usize {
        self.tree.total_words()
    }

    /// Drop every indexed word.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// The underlying tree.
    pub fn tree(&self) -> &MetricTree<M> {
        &self.tree
    }

    /// Take the underlying tree back.
    pub fn into_tree(self) -> MetricTree<M> {
        self.tree
    }
}
