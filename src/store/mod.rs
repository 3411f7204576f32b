//! store
//!
//! Persistent repository state: objects, staging index, refs, and the
//! repository lock.
//!
//! # Modules
//!
//! - [`objects`] - Content-addressed, immutable object storage
//! - [`index`] - The staging index (path to blob digest)
//! - [`refs`] - Branch pointers and HEAD
//! - [`lock`] - Exclusive repository lock
//!
//! # Crash Safety
//!
//! Mutable files (refs, HEAD, index, config) are replaced with
//! write-to-temp-then-rename so abrupt termination never leaves a pointer
//! partially written. Object writes are append-only and idempotent.

pub mod index;
pub mod lock;
pub mod objects;
pub mod refs;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Atomically replace the file at `path` with `content`.
///
/// Writes to a sibling temp file, syncs it to disk, then renames over the
/// target. Rename is atomic on POSIX filesystems, so readers observe
/// either the old content or the new content, never a partial write.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target");

        write_atomic(&path, b"first").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"first");

        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");

        // No temp file left behind
        assert!(!path.with_extension("tmp").exists());
    }
}
