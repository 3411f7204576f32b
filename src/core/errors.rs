//! core::errors
//!
//! The repository error taxonomy.
//!
//! # Design
//!
//! Every component operation returns `Result<_, RepoError>`. The CLI layer
//! is the only place errors are rendered to the user and turned into exit
//! codes; the library never prints.
//!
//! Merge conflicts are deliberately absent here: "merge with conflicts" is
//! an expected, recoverable outcome and is reported as a
//! [`crate::merge::MergeOutcome`] variant, not an error.

use std::path::PathBuf;

use thiserror::Error;

use super::types::{Digest, TypeError};
use crate::store::lock::LockError;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// A requested object digest is not present in the object store.
    #[error("object {0} not found")]
    ObjectNotFound(Digest),

    /// A worktree path handed to `add` does not exist.
    #[error("path '{0}' does not exist")]
    PathNotFound(PathBuf),

    /// A branch name was referenced that is not in the ref store.
    #[error("branch '{0}' does not exist")]
    UnknownBranch(String),

    /// Branch creation collided with an existing name.
    #[error("branch '{0}' already exists")]
    BranchExists(String),

    /// Commit was attempted with an empty staging index.
    #[error("nothing staged; nothing to commit")]
    EmptyCommit,

    /// A merge was requested against a branch with no commits.
    #[error("branch '{0}' has no commits to merge")]
    UnbornBranch(String),

    /// HEAD points at a commit rather than a branch; mutating operations
    /// require a branch HEAD.
    #[error("HEAD is detached at {0}; switch to a branch first")]
    DetachedHead(Digest),

    /// A history walk hit a parent digest missing from the object store.
    ///
    /// Reported rather than silently truncated: the caller learns both the
    /// last commit that resolved and the digest that did not.
    #[error("corrupt history: commit {missing} is missing{suffix}", suffix = last_good_suffix(.last_good))]
    CorruptHistory {
        /// Last commit that was successfully loaded before the gap.
        last_good: Option<Digest>,
        /// The parent digest that could not be resolved.
        missing: Digest,
    },

    /// A stored commit payload failed canonical deserialization.
    #[error("corrupt commit object {digest}: {reason}")]
    CorruptCommit { digest: Digest, reason: String },

    /// The target of a clone already exists.
    #[error("target '{0}' already exists")]
    TargetExists(PathBuf),

    /// No repository was found at or above the working directory.
    #[error("not a stratum repository (no {} directory found)", crate::core::paths::REPO_DIR)]
    NotARepository,

    /// A staged path contained a byte the index format cannot frame.
    #[error("path '{0}' cannot be staged: {1}")]
    InvalidPath(String, String),

    /// Configuration file was unreadable or invalid.
    #[error("invalid repository config: {0}")]
    Config(String),

    /// Domain type validation failure.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Repository lock failure.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// I/O failure on the backing storage medium.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

fn last_good_suffix(last_good: &Option<Digest>) -> String {
    match last_good {
        Some(digest) => format!(" (last good commit: {digest})"),
        None => String::new(),
    }
}
