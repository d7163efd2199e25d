//! # Lexitree
//!
//! Spelling suggestions for noisy tokens, backed by a BK-tree.
//!
//! ## Features
//!
//! - BK-tree index over a pluggable edit-distance metric
//! - Tolerance-bounded queries with triangle-inequality pruning
//! - Versioned, checksummed snapshots written with atomic replace
//! - Self-healing load: a missing or corrupt snapshot is rebuilt from the
//!   dictionary
//!
//! ## Example
//!
//! ```
//! use lexitree::spelling::{Levenshtein, SpellIndex};
//!
//! let index = SpellIndex::build_from_words(["cat", "cats", "bat", "bar"], Levenshtein);
//! assert_eq!(index.suggest("cet"), vec!["cat".to_string()]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod spelling;
pub mod storage;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
