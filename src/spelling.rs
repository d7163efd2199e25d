//! Spelling suggestions for noisy tokens.
//!
//! This module holds the BK-tree index, the edit-distance metrics it is keyed
//! on, the dictionary sources it is built from, and the [`SpellChecker`] that
//! hosts a loaded index behind a suggestion API that never fails.

pub mod checker;
pub mod dictionary;
pub mod index;
pub mod levenshtein;
pub mod tree;

// Re-export commonly used types
pub use checker::SpellChecker;
pub use dictionary::{DictionarySource, FileDictionary, MemoryDictionary};
pub use index::SpellIndex;
pub use levenshtein::{DistanceMetric, Levenshtein, levenshtein_distance};
pub use tree::{DEFAULT_TOLERANCE, MetricTree, Node, TreeStructure};
