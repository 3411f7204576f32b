//! repo
//!
//! The `Repository` handle: one explicitly-constructed owner of the
//! object store, staging index, and ref store. No ambient or global
//! state; every operation flows through a handle.
//!
//! # Locking
//!
//! Each mutating operation (stage, commit, branch create, switch, merge)
//! acquires the exclusive repository lock for its duration and releases
//! it on all exit paths via RAII. Readers (log, branch listing) do not
//! lock; all visible state transitions are atomic renames.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::core::config::RepoConfig;
use crate::core::errors::RepoError;
use crate::core::paths::RepoPaths;
use crate::core::types::{BranchName, Digest};
use crate::graph::commit::Commit;
use crate::graph::{CommitGraph, History};
use crate::merge::{MergeEngine, MergeOutcome};
use crate::store::index::StagingIndex;
use crate::store::lock::RepoLock;
use crate::store::objects::ObjectStore;
use crate::store::refs::RefStore;

/// Result of `Repository::init_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A fresh repository was created.
    Created,
    /// A repository already existed here; nothing was changed.
    AlreadyInitialized,
}

/// Result of `Repository::switch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// HEAD now names the requested branch.
    Switched,
    /// The requested branch was already active; nothing was changed.
    AlreadyOn,
}

/// A merge outcome together with the branch names involved, for
/// rendering.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub current: BranchName,
    pub other: BranchName,
    pub outcome: MergeOutcome,
}

/// Handle to one on-disk repository.
#[derive(Debug)]
pub struct Repository {
    paths: RepoPaths,
    config: RepoConfig,
    objects: ObjectStore,
    refs: RefStore,
    index: StagingIndex,
}

impl Repository {
    /// Initialize a repository in `worktree`, or report that one already
    /// exists there (re-init is benign and changes nothing).
    ///
    /// A fresh repository gets the full layout: config, object directory,
    /// an unborn default branch, HEAD pointing at it, and an empty index.
    pub fn init_at(
        worktree: &Path,
        default_branch: Option<&BranchName>,
    ) -> Result<(Self, InitOutcome), RepoError> {
        let paths = RepoPaths::new(worktree);
        if paths.is_initialized() {
            return Ok((Self::open_at(paths)?, InitOutcome::AlreadyInitialized));
        }

        let config = match default_branch {
            Some(branch) => RepoConfig::with_default_branch(branch),
            None => RepoConfig::default(),
        };
        let branch = BranchName::new(&config.default_branch)?;

        fs::create_dir_all(paths.objects_dir())?;
        fs::create_dir_all(paths.heads_dir())?;
        crate::store::write_atomic(&paths.config_path(), config.to_toml()?.as_bytes())?;
        crate::store::write_atomic(&paths.index_path(), b"")?;

        let refs = RefStore::new(paths.clone());
        refs.create_branch(&branch, None)?;
        refs.set_head(&branch)?;

        Ok((Self::open_at(paths)?, InitOutcome::Created))
    }

    /// Open the repository containing `start`, walking upward to find the
    /// worktree root.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::NotARepository` if no repository directory is
    /// found at or above `start`.
    pub fn discover(start: &Path) -> Result<Self, RepoError> {
        let paths = RepoPaths::discover(start).ok_or(RepoError::NotARepository)?;
        Self::open_at(paths)
    }

    fn open_at(paths: RepoPaths) -> Result<Self, RepoError> {
        let config = RepoConfig::load(&paths.config_path())?;
        let objects = ObjectStore::new(paths.clone());
        let refs = RefStore::new(paths.clone());
        let index = StagingIndex::load(paths.clone())?;
        Ok(Self {
            paths,
            config,
            objects,
            refs,
            index,
        })
    }

    /// Path router for this repository.
    pub fn paths(&self) -> &RepoPaths {
        &self.paths
    }

    /// Repository configuration.
    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// The branch HEAD currently names.
    pub fn current_branch(&self) -> Result<BranchName, RepoError> {
        self.refs.head_branch()
    }

    /// Tip of the current branch, `None` while the branch is unborn.
    pub fn head_tip(&self) -> Result<Option<Digest>, RepoError> {
        let branch = self.refs.head_branch()?;
        self.refs.resolve(&branch)
    }

    /// Tip of any named branch, `None` while that branch is unborn.
    pub fn branch_tip(&self, name: &BranchName) -> Result<Option<Digest>, RepoError> {
        self.refs.resolve(name)
    }

    /// Number of staged entries.
    pub fn staged_len(&self) -> usize {
        self.index.len()
    }

    /// Stage one worktree file: hash its content into the object store
    /// and upsert the index mapping. Returns the blob digest.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::PathNotFound` if the file does not exist.
    pub fn add(&mut self, path: &str) -> Result<Digest, RepoError> {
        let _lock = RepoLock::acquire(&self.paths)?;

        let file = self.paths.worktree().join(path);
        let content = match fs::read(&file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepoError::PathNotFound(PathBuf::from(path)))
            }
            Err(e) => return Err(RepoError::Storage(e)),
        };

        let digest = self.objects.put(&content)?;
        self.index.stage(path, digest.clone())?;
        Ok(digest)
    }

    /// Freeze the staged entries into a new commit on the current branch,
    /// timestamped with the wall clock.
    pub fn commit(&mut self, message: &str) -> Result<Digest, RepoError> {
        self.commit_at(message, Utc::now().timestamp())
    }

    /// Freeze the staged entries into a new commit with an explicit
    /// timestamp. Identical staged entries, message, timestamp, and
    /// parent always produce an identical commit digest.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::EmptyCommit` if nothing is staged; the object
    /// store and refs are left untouched in that case.
    pub fn commit_at(&mut self, message: &str, timestamp: i64) -> Result<Digest, RepoError> {
        let _lock = RepoLock::acquire(&self.paths)?;

        if self.index.is_empty() {
            return Err(RepoError::EmptyCommit);
        }

        let branch = self.refs.head_branch()?;
        let parent = self.refs.resolve(&branch)?;

        let commit = Commit {
            parent,
            timestamp,
            message: message.to_string(),
            entries: self.index.snapshot(),
        };

        let graph = CommitGraph::new(&self.objects);
        let digest = graph.write(&commit)?;
        self.refs.update_branch(&branch, &digest)?;
        self.index.clear()?;

        Ok(digest)
    }

    /// Lazy history walk from the current branch tip, newest first.
    ///
    /// `None` means the current branch has no commits yet.
    pub fn history(&self) -> Result<Option<History<'_>>, RepoError> {
        let graph = CommitGraph::new(&self.objects);
        Ok(self.head_tip()?.map(|tip| graph.history(tip)))
    }

    /// Create a branch at the current branch tip. Branching an unborn
    /// branch creates another unborn branch.
    pub fn create_branch(&self, name: &BranchName) -> Result<(), RepoError> {
        let _lock = RepoLock::acquire(&self.paths)?;
        let tip = self.head_tip()?;
        self.refs.create_branch(name, tip.as_ref())
    }

    /// All branch names plus the currently active one.
    pub fn branches(&self) -> Result<(std::collections::BTreeSet<BranchName>, BranchName), RepoError> {
        Ok((self.refs.list_branches()?, self.refs.head_branch()?))
    }

    /// Point HEAD at `name`. Switching to the already-active branch is a
    /// no-op that changes nothing on disk.
    pub fn switch(&self, name: &BranchName) -> Result<SwitchOutcome, RepoError> {
        let _lock = RepoLock::acquire(&self.paths)?;

        if self.refs.head_branch()? == *name {
            return Ok(SwitchOutcome::AlreadyOn);
        }
        self.refs.set_head(name)?;
        Ok(SwitchOutcome::Switched)
    }

    /// Merge `other` into the current branch.
    ///
    /// Fast-forwards advance the current branch pointer without a new
    /// commit; clean divergent merges write a commit parented on the
    /// current tip with message `Merge <other> into <current>`; conflicts
    /// change nothing and report the conflicting paths.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::UnbornBranch` if either branch has no commits.
    pub fn merge(&mut self, other: &BranchName) -> Result<MergeReport, RepoError> {
        let _lock = RepoLock::acquire(&self.paths)?;

        let current = self.refs.head_branch()?;
        let current_tip = self
            .refs
            .resolve(&current)?
            .ok_or_else(|| RepoError::UnbornBranch(current.to_string()))?;
        let other_tip = self
            .refs
            .resolve(other)?
            .ok_or_else(|| RepoError::UnbornBranch(other.to_string()))?;

        let message = format!("Merge {other} into {current}");
        let engine = MergeEngine::new(&self.objects);
        let outcome = engine.merge(
            &current_tip,
            &other_tip,
            &message,
            Utc::now().timestamp(),
        )?;

        match &outcome {
            MergeOutcome::FastForward { new_tip } => {
                self.refs.update_branch(&current, new_tip)?;
            }
            MergeOutcome::Merged { new_commit } => {
                self.refs.update_branch(&current, new_commit)?;
            }
            MergeOutcome::AlreadyUpToDate | MergeOutcome::Conflict { .. } => {}
        }

        Ok(MergeReport {
            current,
            other: other.clone(),
            outcome,
        })
    }

    /// Copy the repository directory byte-for-byte into
    /// `<target>/.stratum`.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::TargetExists` if `target` already exists.
    pub fn clone_to(&self, target: &Path) -> Result<(), RepoError> {
        if target.exists() {
            return Err(RepoError::TargetExists(target.to_path_buf()));
        }
        let dest = RepoPaths::new(target).repo_dir();
        copy_dir_recursive(&self.paths.repo_dir(), &dest)?;
        Ok(())
    }
}

/// Recursively copy a directory tree.
fn copy_dir_recursive(src: &Path, dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}
