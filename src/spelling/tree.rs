//! BK-tree over an edit-distance metric.
//!
//! Nodes live in an arena owned by [`TreeStructure`]. Slot 0 is the root and
//! every other slot is referenced by exactly one labelled edge, so the arena
//! is a single-owner tree addressed by index. The structure carries no metric;
//! a [`MetricTree`] binds one to it.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LexitreeError, Result};
use crate::spelling::levenshtein::{DistanceMetric, Levenshtein};

/// Tolerance used by [`MetricTree::search`] and the suggestion facade.
pub const DEFAULT_TOLERANCE: usize = 1;

/// One indexed word and its outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    word: String,
    /// Edge label (distance to the child word) to child slot.
    #[serde(default)]
    children: BTreeMap<usize, usize>,
}

impl Node {
    fn leaf(word: &str) -> Self {
        Node {
            word: word.to_string(),
            children: BTreeMap::new(),
        }
    }

    /// The word stored in this node.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Outgoing edges, keyed by distance, in ascending order.
    pub fn children(&self) -> &BTreeMap<usize, usize> {
        &self.children
    }
}

/// The structure-only form of a tree: words and edge labels, no metric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStructure {
    nodes: Vec<Node>,
}

impl TreeStructure {
    /// Create an empty structure.
    pub fn new() -> Self {
        TreeStructure { nodes: Vec::new() }
    }

    /// Rebuild a structure from a node arena, checking that it forms a
    /// single-owner tree rooted at slot 0.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self> {
        validate_arena(&nodes)?;
        Ok(TreeStructure { nodes })
    }

    /// The node arena. Slot 0 is the root when non-empty.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no words.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stored words in insertion order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.word.as_str())
    }
}

fn validate_arena(nodes: &[Node]) -> Result<()> {
    let mut has_parent = vec![false; nodes.len()];
    let mut words = HashSet::with_capacity(nodes.len());

    for (slot, node) in nodes.iter().enumerate() {
        if !words.insert(node.word.as_str()) {
            return Err(LexitreeError::snapshot_read(format!(
                "word {:?} is stored more than once",
                node.word
            )));
        }

        for (&edge, &child) in &node.children {
            if edge == 0 {
                return Err(LexitreeError::snapshot_read(format!(
                    "node {slot} has an edge labelled 0"
                )));
            }
            if child == 0 || child >= nodes.len() {
                return Err(LexitreeError::snapshot_read(format!(
                    "node {slot} points to slot {child} outside the arena"
                )));
            }
            if std::mem::replace(&mut has_parent[child], true) {
                return Err(LexitreeError::snapshot_read(format!(
                    "slot {child} has more than one parent"
                )));
            }
        }
    }

    if nodes.is_empty() {
        return Ok(());
    }

    // Every non-root slot has one parent, so the part reachable from the root
    // is a tree and this walk terminates.
    let mut reachable = 0;
    let mut pending = vec![0];
    while let Some(slot) = pending.pop() {
        reachable += 1;
        pending.extend(nodes[slot].children.values().copied());
    }

    if reachable != nodes.len() {
        return Err(LexitreeError::snapshot_read(format!(
            "{} of {} slots are unreachable from the root",
            nodes.len() - reachable,
            nodes.len()
        )));
    }

    Ok(())
}

/// Lower-case the word only when upper-casing leaves it unchanged.
///
/// Mixed-case and lower-case input is searched verbatim.
pub fn fold_case(word: &str) -> Cow<'_, str> {
    if word == word.to_uppercase() {
        Cow::Owned(word.to_lowercase())
    } else {
        Cow::Borrowed(word)
    }
}

/// A BK-tree keyed on a pluggable distance metric.
pub struct MetricTree<M = Levenshtein> {
    structure: TreeStructure,
    metric: M,
}

impl Default for MetricTree<Levenshtein> {
    fn default() -> Self {
        MetricTree::new(Levenshtein)
    }
}

impl<M> fmt::Debug for MetricTree<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricTree")
            .field("total_words", &self.structure.len())
            .finish_non_exhaustive()
    }
}

impl<M: DistanceMetric> MetricTree<M> {
    /// Create an empty tree using the given metric.
    pub fn new(metric: M) -> Self {
        MetricTree {
            structure: TreeStructure::new(),
            metric,
        }
    }

    /// Bind a metric to a previously built structure.
    ///
    /// The metric must compute the same distances as the one the structure
    /// was built with, otherwise queries may miss matches.
    pub fn from_structure(structure: TreeStructure, metric: M) -> Self {
        MetricTree { structure, metric }
    }

    /// Insert a word. Returns `false` when the word was already present.
    pub fn insert(&mut self, word: &str) -> bool {
        if self.structure.nodes.is_empty() {
            self.structure.nodes.push(Node::leaf(word));
            return true;
        }

        let mut slot = 0;
        loop {
            let node = &self.structure.nodes[slot];
            let distance = self.metric.distance(&node.word, word);
            if distance == 0 {
                return false;
            }

            match node.children.get(&distance).copied() {
                Some(child) => slot = child,
                None => {
                    let child = self.structure.nodes.len();
                    self.structure.nodes.push(Node::leaf(word));
                    self.structure.nodes[slot].children.insert(distance, child);
                    return true;
                }
            }
        }
    }

    /// All stored words within `tolerance` of `word`.
    ///
    /// An exact match anywhere in the tree ends the query and returns just
    /// that word. Otherwise matches come back in depth-first order with
    /// children visited by ascending edge label.
    pub fn query(&self, word: &str, tolerance: usize) -> Vec<String> {
        let mut matches = Vec::new();
        if self.structure.nodes.is_empty() {
            return matches;
        }

        let mut pending = vec![0];
        while let Some(slot) = pending.pop() {
            let node = &self.structure.nodes[slot];
            let distance = self.metric.distance(word, &node.word);

            if distance == 0 {
                return vec![node.word.clone()];
            }
            if distance <= tolerance {
                matches.push(node.word.clone());
            }

            // Triangle inequality: a word under edge k is at least |distance - k|
            // away from the query.
            let low = distance.saturating_sub(tolerance).max(1);
            let high = distance.saturating_add(tolerance);
            pending.extend(
                node.children
                    .range(low..=high)
                    .rev()
                    .map(|(_, &child)| child),
            );
        }

        matches
    }

    /// Case-folded query with the default tolerance.
    pub fn search(&self, word: &str) -> Vec<String> {
        self.search_within(word, DEFAULT_TOLERANCE)
    }

    /// Case-folded query with a caller-supplied tolerance.
    pub fn search_within(&self, word: &str, tolerance: usize) -> Vec<String> {
        if self.structure.nodes.is_empty() {
            return Vec::new();
        }
        self.query(&fold_case(word), tolerance)
    }

    /// Drop every stored word.
    pub fn clear(&mut self) {
        self.structure.nodes.clear();
    }

    /// Number of stored words.
    pub fn total_words(&self) -> usize {
        self.structure.len()
    }

    /// Whether the tree holds no words.
    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }

    /// Replace the metric used by subsequent inserts and queries.
    ///
    /// Existing edges are not recomputed. Only swap in a metric equivalent to
    /// the one that built the tree.
    pub fn set_metric(&mut self, metric: M) {
        self.metric = metric;
    }

    /// Rebind the structure to a metric of another type.
    pub fn with_metric<N: DistanceMetric>(self, metric: N) -> MetricTree<N> {
        MetricTree {
            structure: self.structure,
            metric,
        }
    }

    /// The metric in use.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// The structure-only view used for persistence.
    pub fn structure(&self) -> &TreeStructure {
        &self.structure
    }

    /// Give up the metric and keep the structure.
    pub fn into_structure(self) -> TreeStructure {
        self.structure
    }
}
