//! store::refs
//!
//! Branch pointers and the HEAD indirection.
//!
//! # On-Disk Format
//!
//! - `refs/heads/<branch>` holds one commit digest, or nothing at all for
//!   a branch with no commits yet (an "unborn" branch)
//! - `HEAD` holds `refs/heads/<branch>` in the normal symbolic state, or a
//!   bare digest when detached
//!
//! All writes go through the atomic temp-then-rename helper, so a crash
//! never leaves a branch pointer partially written.
//!
//! # Invariants
//!
//! - Branch names are unique (one file per branch)
//! - HEAD always names an existing branch, except in the reserved
//!   detached state which no current operation produces

use std::collections::BTreeSet;
use std::fs;
use std::io;

use crate::core::errors::RepoError;
use crate::core::paths::RepoPaths;
use crate::core::types::{BranchName, Digest};

use super::write_atomic;

/// The HEAD indirection: symbolic in the normal state, detached when it
/// names a commit directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// HEAD names a branch (`refs/heads/<name>`).
    Branch(BranchName),
    /// HEAD names a commit directly. Parsed and representable, but no
    /// current operation produces this state.
    Detached(Digest),
}

/// Mutable branch-name to commit-digest mapping, plus HEAD.
#[derive(Debug, Clone)]
pub struct RefStore {
    paths: RepoPaths,
}

impl RefStore {
    /// Create a ref store over a repository's paths.
    pub fn new(paths: RepoPaths) -> Self {
        Self { paths }
    }

    /// Read and parse HEAD.
    pub fn head(&self) -> Result<Head, RepoError> {
        let raw = fs::read_to_string(self.paths.head_path())?;
        let raw = raw.trim();

        if let Some(name) = raw.strip_prefix("refs/heads/") {
            return Ok(Head::Branch(BranchName::new(name)?));
        }
        Ok(Head::Detached(Digest::new(raw)?))
    }

    /// The branch HEAD currently names.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::DetachedHead` if HEAD names a commit directly;
    /// mutating operations require a branch HEAD.
    pub fn head_branch(&self) -> Result<BranchName, RepoError> {
        match self.head()? {
            Head::Branch(name) => Ok(name),
            Head::Detached(digest) => Err(RepoError::DetachedHead(digest)),
        }
    }

    /// Point HEAD at `branch`.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::UnknownBranch` if the branch does not exist.
    pub fn set_head(&self, branch: &BranchName) -> Result<(), RepoError> {
        if !self.branch_exists(branch) {
            return Err(RepoError::UnknownBranch(branch.to_string()));
        }
        let content = format!("refs/heads/{branch}\n");
        write_atomic(&self.paths.head_path(), content.as_bytes())?;
        Ok(())
    }

    /// Resolve a branch to its tip digest.
    ///
    /// `Ok(None)` means the branch exists but has no commits yet.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::UnknownBranch` if the branch does not exist.
    pub fn resolve(&self, branch: &BranchName) -> Result<Option<Digest>, RepoError> {
        let raw = match fs::read_to_string(self.paths.branch_path(branch.as_str())) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RepoError::UnknownBranch(branch.to_string()))
            }
            Err(e) => return Err(RepoError::Storage(e)),
        };

        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(Digest::new(raw)?))
    }

    /// Record a new branch pointing at `at` (or unborn when `None`).
    ///
    /// # Errors
    ///
    /// Returns `RepoError::BranchExists` on a name collision.
    pub fn create_branch(
        &self,
        branch: &BranchName,
        at: Option<&Digest>,
    ) -> Result<(), RepoError> {
        if self.branch_exists(branch) {
            return Err(RepoError::BranchExists(branch.to_string()));
        }
        self.write_tip(branch, at)
    }

    /// Advance an existing branch tip to `to`.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::UnknownBranch` if the branch does not exist.
    pub fn update_branch(&self, branch: &BranchName, to: &Digest) -> Result<(), RepoError> {
        if !self.branch_exists(branch) {
            return Err(RepoError::UnknownBranch(branch.to_string()));
        }
        self.write_tip(branch, Some(to))
    }

    /// Whether a branch with this name exists.
    pub fn branch_exists(&self, branch: &BranchName) -> bool {
        self.paths.branch_path(branch.as_str()).is_file()
    }

    /// All branch names, sorted.
    pub fn list_branches(&self) -> Result<BTreeSet<BranchName>, RepoError> {
        let mut branches = BTreeSet::new();
        for entry in fs::read_dir(self.paths.heads_dir())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            // Skip leftover temp files from interrupted atomic writes.
            if name.ends_with(".tmp") {
                continue;
            }
            branches.insert(BranchName::new(name)?);
        }
        Ok(branches)
    }

    fn write_tip(&self, branch: &BranchName, tip: Option<&Digest>) -> Result<(), RepoError> {
        let content = match tip {
            Some(digest) => format!("{digest}\n"),
            None => String::new(),
        };
        write_atomic(
            &self.paths.branch_path(branch.as_str()),
            content.as_bytes(),
        )?;
        Ok(())
    }
}
