//! Atomic file replacement.
//!
//! New contents are written to a sibling `<name>.tmp` file, flushed and
//! synced, and only then moved over the destination. An existing file at the
//! destination is never opened for writing, so a failed write leaves it
//! intact.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{LexitreeError, Result};

/// How the destination file was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceMode {
    /// The temp file was renamed over the destination.
    Renamed,
    /// Rename failed; the temp file was copied over the destination and removed.
    Copied,
}

/// Temp file used while writing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replace `path` with `bytes`.
///
/// Parent directories are created when missing.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<ReplaceMode> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                LexitreeError::snapshot_write(format!(
                    "failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }

    let tmp_path = temp_path(path);
    if let Err(e) = write_synced(&tmp_path, bytes) {
        fs::remove_file(&tmp_path).ok();
        return Err(LexitreeError::snapshot_write(format!(
            "failed to write {}: {e}",
            tmp_path.display()
        )));
    }

    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(ReplaceMode::Renamed),
        Err(e) => {
            warn!(
                "Renaming {} to {} failed ({e}); falling back to copy",
                tmp_path.display(),
                path.display()
            );
            replace_by_copy(&tmp_path, path)?;
            Ok(ReplaceMode::Copied)
        }
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Copy `tmp_path` over `path`, then remove `tmp_path` whether or not the copy
/// succeeded.
pub(crate) fn replace_by_copy(tmp_path: &Path, path: &Path) -> Result<()> {
    let copied = fs::copy(tmp_path, path);
    fs::remove_file(tmp_path).ok();

    copied.map(|_| ()).map_err(|e| {
        LexitreeError::snapshot_write(format!(
            "failed to copy {} to {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path(Path::new("/data/words.bktree")),
            PathBuf::from("/data/words.bktree.tmp")
        );
    }

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.bin");

        assert_eq!(write_atomic(&path, b"first").unwrap(), ReplaceMode::Renamed);
        assert_eq!(fs::read(&path).unwrap(), b"first");

        assert_eq!(write_atomic(&path, b"second").unwrap(), ReplaceMode::Renamed);
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_atomic_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/snapshot.bin");

        write_atomic(&path, b"data").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn test_failed_write_keeps_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.bin");
        fs::write(&path, b"valid").unwrap();

        // A directory squatting on the temp path makes the write fail.
        fs::create_dir(temp_path(&path)).unwrap();

        let result = write_atomic(&path, b"replacement");
        assert!(matches!(result, Err(LexitreeError::SnapshotWrite(_))));
        assert_eq!(fs::read(&path).unwrap(), b"valid");
    }

    #[test]
    fn test_replace_by_copy() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.bin");
        let tmp_path = temp_path(&path);
        fs::write(&path, b"old").unwrap();
        fs::write(&tmp_path, b"new").unwrap();

        replace_by_copy(&tmp_path, &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert!(!tmp_path.exists());
    }

    #[test]
    fn test_replace_by_copy_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.bin");
        fs::write(&path, b"old").unwrap();

        let result = replace_by_copy(&temp_path(&path), &path);
        assert!(matches!(result, Err(LexitreeError::SnapshotWrite(_))));
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }
}
