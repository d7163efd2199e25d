//! Durable snapshots of the spelling index.
//!
//! # Architecture
//!
//! - **file**: atomic temp-file + rename replacement, with a copy fallback
//! - **snapshot**: versioned, checksummed, structure-only encoding
//! - **store**: [`SnapshotStore`], which loads a snapshot or rebuilds from the
//!   dictionary and persists the result
//!
//! # Example
//!
//! ```no_run
//! use lexitree::spelling::{FileDictionary, Levenshtein};
//! use lexitree::storage::SnapshotStore;
//!
//! let store = SnapshotStore::new("/var/lib/app/words.bktree");
//! let dictionary = FileDictionary::new("/usr/share/app/words.txt");
//! let tree = store.load(&dictionary, Levenshtein);
//! println!("{} words", tree.total_words());
//! ```

pub mod file;
pub mod snapshot;
pub mod store;

pub use store::{LoadReport, LoadSource, RebuildReason, SnapshotStore};
