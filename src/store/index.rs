//! store::index
//!
//! The staging index: an ordered mapping of worktree path to staged blob
//! digest.
//!
//! # On-Disk Format
//!
//! One line per entry in the `index` file:
//!
//! ```text
//! <64-hex-digest> <path>
//! ```
//!
//! The digest comes first because paths may contain spaces; the path runs
//! to end-of-line. Paths containing newlines are rejected at staging time.
//!
//! # Invariants
//!
//! - Staging the same path twice overwrites the prior entry (last write
//!   wins), never appends a duplicate
//! - Snapshots are path-lexicographic so commit digests are reproducible
//! - The index is empty immediately after a successful commit

use std::collections::BTreeMap;
use std::fs;
use std::io;

use serde::{Deserialize, Serialize};

use crate::core::errors::RepoError;
use crate::core::paths::RepoPaths;
use crate::core::types::Digest;

use super::write_atomic;

/// One staged (or committed) path/digest pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Worktree-relative path, as staged.
    pub path: String,
    /// Digest of the blob staged for this path.
    pub digest: Digest,
}

/// The staging index, keyed by path.
///
/// Loaded from disk on open; every mutation is persisted atomically before
/// the operation reports success.
#[derive(Debug)]
pub struct StagingIndex {
    paths: RepoPaths,
    entries: BTreeMap<String, Digest>,
}

impl StagingIndex {
    /// Load the index from the repository's `index` file.
    ///
    /// A missing file is treated as an empty index (the state immediately
    /// after `init` or after a commit on a fresh checkout).
    pub fn load(paths: RepoPaths) -> Result<Self, RepoError> {
        let raw = match fs::read_to_string(paths.index_path()) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(RepoError::Storage(e)),
        };

        let mut entries = BTreeMap::new();
        for line in raw.lines() {
            if line.is_empty() {
                continue;
            }
            let (digest, path) = line.split_once(' ').ok_or_else(|| {
                RepoError::Storage(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("malformed index line: '{line}'"),
                ))
            })?;
            entries.insert(path.to_string(), Digest::new(digest)?);
        }

        Ok(Self { paths, entries })
    }

    /// Upsert the mapping for `path`, persisting the index.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::InvalidPath` if the path is empty or contains a
    /// newline (which the line format cannot frame).
    pub fn stage(&mut self, path: &str, digest: Digest) -> Result<(), RepoError> {
        if path.is_empty() {
            return Err(RepoError::InvalidPath(
                path.to_string(),
                "path is empty".into(),
            ));
        }
        if path.contains('\n') {
            return Err(RepoError::InvalidPath(
                path.to_string(),
                "path contains a newline".into(),
            ));
        }

        self.entries.insert(path.to_string(), digest);
        self.persist()
    }

    /// Snapshot the staged entries in path-lexicographic order.
    pub fn snapshot(&self) -> Vec<IndexEntry> {
        self.entries
            .iter()
            .map(|(path, digest)| IndexEntry {
                path: path.clone(),
                digest: digest.clone(),
            })
            .collect()
    }

    /// Empty the index, persisting the empty state.
    ///
    /// Called only by a successful commit.
    pub fn clear(&mut self) -> Result<(), RepoError> {
        self.entries.clear();
        self.persist()
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of staged entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn persist(&self) -> Result<(), RepoError> {
        let mut out = String::new();
        for (path, digest) in &self.entries {
            out.push_str(digest.as_str());
            out.push(' ');
            out.push_str(path);
            out.push('\n');
        }
        write_atomic(&self.paths.index_path(), out.as_bytes())?;
        Ok(())
    }
}
