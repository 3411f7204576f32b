//! core::paths
//!
//! Centralized path routing for repository storage locations.
//!
//! # Storage Layout
//!
//! All repository data is stored under `<worktree>/.stratum/`:
//! - `config.toml` - Repository configuration
//! - `objects/` - Content-addressed blob and commit payloads
//! - `refs/heads/` - One file per branch, holding one commit digest
//! - `HEAD` - Symbolic pointer to the active branch
//! - `index` - Staged path/digest pairs
//! - `lock` - Exclusive lock file
//!
//! **Hard rule:** no code outside this module computes `.stratum/...`
//! joins. All storage paths go through [`RepoPaths`].
//!
//! # Example
//!
//! ```
//! use stratum::core::paths::RepoPaths;
//! use std::path::PathBuf;
//!
//! let paths = RepoPaths::new(PathBuf::from("/work/project"));
//!
//! assert_eq!(
//!     paths.head_path(),
//!     PathBuf::from("/work/project/.stratum/HEAD")
//! );
//! ```

use std::path::{Path, PathBuf};

/// Name of the repository directory inside a worktree.
pub const REPO_DIR: &str = ".stratum";

/// Centralized path routing for repository storage.
///
/// # Invariants
///
/// - Every storage location is derived from the worktree root
/// - No code outside this module should join `.stratum` paths by hand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPaths {
    /// Root of the worktree containing the repository.
    worktree: PathBuf,
}

impl RepoPaths {
    /// Create a new path router rooted at a worktree directory.
    pub fn new(worktree: impl Into<PathBuf>) -> Self {
        Self {
            worktree: worktree.into(),
        }
    }

    /// Walk upward from `start` looking for a directory containing
    /// `.stratum`. Returns the router for the first worktree found.
    ///
    /// Used by every command except `init` so the tool works from
    /// subdirectories of the worktree.
    pub fn discover(start: &Path) -> Option<Self> {
        let mut dir = start;
        loop {
            if dir.join(REPO_DIR).is_dir() {
                return Some(Self::new(dir));
            }
            dir = dir.parent()?;
        }
    }

    /// Root of the worktree.
    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    /// The repository directory: `<worktree>/.stratum`.
    pub fn repo_dir(&self) -> PathBuf {
        self.worktree.join(REPO_DIR)
    }

    /// Whether the repository directory exists.
    pub fn is_initialized(&self) -> bool {
        self.repo_dir().is_dir()
    }

    /// Repository config file: `.stratum/config.toml`.
    pub fn config_path(&self) -> PathBuf {
        self.repo_dir().join("config.toml")
    }

    /// Object storage directory: `.stratum/objects`.
    pub fn objects_dir(&self) -> PathBuf {
        self.repo_dir().join("objects")
    }

    /// Path of one stored object.
    pub fn object_path(&self, hex_digest: &str) -> PathBuf {
        self.objects_dir().join(hex_digest)
    }

    /// Branch ref directory: `.stratum/refs/heads`.
    pub fn heads_dir(&self) -> PathBuf {
        self.repo_dir().join("refs").join("heads")
    }

    /// Path of one branch ref file.
    pub fn branch_path(&self, branch: &str) -> PathBuf {
        self.heads_dir().join(branch)
    }

    /// HEAD file: `.stratum/HEAD`.
    pub fn head_path(&self) -> PathBuf {
        self.repo_dir().join("HEAD")
    }

    /// Staging index file: `.stratum/index`.
    pub fn index_path(&self) -> PathBuf {
        self.repo_dir().join("index")
    }

    /// Lock file: `.stratum/lock`.
    pub fn lock_path(&self) -> PathBuf {
        self.repo_dir().join("lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_rooted_at_worktree() {
        let paths = RepoPaths::new("/work/project");
        assert_eq!(paths.repo_dir(), PathBuf::from("/work/project/.stratum"));
        assert_eq!(
            paths.branch_path("master"),
            PathBuf::from("/work/project/.stratum/refs/heads/master")
        );
        assert_eq!(
            paths.object_path("abc"),
            PathBuf::from("/work/project/.stratum/objects/abc")
        );
        assert_eq!(
            paths.index_path(),
            PathBuf::from("/work/project/.stratum/index")
        );
    }

    #[test]
    fn discover_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert!(RepoPaths::discover(&nested).is_none());

        std::fs::create_dir_all(dir.path().join(REPO_DIR)).unwrap();
        let found = RepoPaths::discover(&nested).unwrap();
        assert_eq!(found.worktree(), dir.path());
    }
}
