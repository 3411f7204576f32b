//! graph
//!
//! The commit history graph: creating commit records, walking ancestry,
//! and finding common ancestors.
//!
//! # Modules
//!
//! - [`commit`] - The commit record and its canonical codec
//!
//! # Architecture
//!
//! Commits form a parent-linked chain persisted in the object store; the
//! graph layer is stateless and borrows the store for traversal. History
//! walks are lazy and yield each commit exactly once, ending at a root
//! commit. A dangling parent pointer aborts the walk with
//! `CorruptHistory`, naming both the last commit that resolved and the
//! missing digest, rather than silently truncating.

pub mod commit;

use std::collections::HashSet;

use crate::core::errors::RepoError;
use crate::core::types::Digest;
use crate::store::objects::ObjectStore;

pub use commit::Commit;

/// Read and write access to the commit chain in an object store.
#[derive(Debug, Clone, Copy)]
pub struct CommitGraph<'a> {
    objects: &'a ObjectStore,
}

impl<'a> CommitGraph<'a> {
    /// Create a graph view over an object store.
    pub fn new(objects: &'a ObjectStore) -> Self {
        Self { objects }
    }

    /// Persist a commit record, returning its digest.
    pub fn write(&self, commit: &Commit) -> Result<Digest, RepoError> {
        self.objects.put(&commit.encode())
    }

    /// Load and decode the commit stored under `digest`.
    ///
    /// # Errors
    ///
    /// - `RepoError::ObjectNotFound` if no object has this digest
    /// - `RepoError::CorruptCommit` if the payload fails canonical
    ///   decoding
    pub fn load(&self, digest: &Digest) -> Result<Commit, RepoError> {
        let bytes = self.objects.get(digest)?;
        Commit::decode(&bytes).map_err(|e| RepoError::CorruptCommit {
            digest: digest.clone(),
            reason: e.to_string(),
        })
    }

    /// Lazily walk parent links from `from` back to the root.
    pub fn history(&self, from: Digest) -> History<'a> {
        History {
            graph: *self,
            next: Some(from),
            last_good: None,
            seen: HashSet::new(),
        }
    }

    /// Whether `ancestor` is reachable from `descendant` by following
    /// parent links. A commit counts as its own ancestor.
    pub fn is_ancestor(&self, ancestor: &Digest, descendant: &Digest) -> Result<bool, RepoError> {
        for step in self.history(descendant.clone()) {
            let (digest, _) = step?;
            if digest == *ancestor {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The nearest commit reachable from both `a` and `b`.
    ///
    /// Walks `a`'s ancestors into a set, then scans `b`'s ancestors for
    /// the first hit. `None` means the two histories share no root, which
    /// should not occur for branches of one repository but is handled
    /// rather than assumed.
    pub fn common_ancestor(&self, a: &Digest, b: &Digest) -> Result<Option<Digest>, RepoError> {
        let mut reachable_from_a = HashSet::new();
        for step in self.history(a.clone()) {
            let (digest, _) = step?;
            reachable_from_a.insert(digest);
        }

        for step in self.history(b.clone()) {
            let (digest, _) = step?;
            if reachable_from_a.contains(&digest) {
                return Ok(Some(digest));
            }
        }
        Ok(None)
    }
}

/// Lazy ancestry walk, newest first.
///
/// Yields `(digest, commit)` pairs. The walk is fused: after yielding an
/// error or reaching a root commit it yields nothing further.
#[derive(Debug)]
pub struct History<'a> {
    graph: CommitGraph<'a>,
    next: Option<Digest>,
    last_good: Option<Digest>,
    seen: HashSet<Digest>,
}

impl Iterator for History<'_> {
    type Item = Result<(Digest, Commit), RepoError>;

    fn next(&mut self) -> Option<Self::Item> {
        let digest = self.next.take()?;

        // A chain revisiting a digest would loop forever; yield each
        // commit exactly once and stop at the first repeat.
        if !self.seen.insert(digest.clone()) {
            return None;
        }

        let commit = match self.graph.load(&digest) {
            Ok(commit) => commit,
            Err(RepoError::ObjectNotFound(missing)) => {
                return Some(Err(RepoError::CorruptHistory {
                    last_good: self.last_good.clone(),
                    missing,
                }));
            }
            Err(e) => return Some(Err(e)),
        };

        self.last_good = Some(digest.clone());
        self.next = commit.parent.clone();
        Some(Ok((digest, commit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::RepoPaths;
    use crate::store::index::IndexEntry;

    fn store() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let paths = RepoPaths::new(dir.path());
        std::fs::create_dir_all(paths.objects_dir()).unwrap();
        (dir, ObjectStore::new(paths))
    }

    fn commit(parent: Option<&Digest>, message: &str) -> Commit {
        Commit {
            parent: parent.cloned(),
            timestamp: 1_700_000_000,
            message: message.to_string(),
            entries: vec![IndexEntry {
                path: "f.txt".into(),
                digest: Digest::of_bytes(message.as_bytes()),
            }],
        }
    }

    /// Build a chain of `n` commits, returning digests oldest first.
    fn chain(graph: &CommitGraph<'_>, n: usize) -> Vec<Digest> {
        let mut digests = Vec::new();
        let mut parent: Option<Digest> = None;
        for i in 0..n {
            let c = commit(parent.as_ref(), &format!("commit {i}"));
            let digest = graph.write(&c).unwrap();
            parent = Some(digest.clone());
            digests.push(digest);
        }
        digests
    }

    #[test]
    fn history_walks_to_root_once_each() {
        let (_dir, objects) = store();
        let graph = CommitGraph::new(&objects);
        let digests = chain(&graph, 3);

        let walked: Vec<Digest> = graph
            .history(digests[2].clone())
            .map(|step| step.unwrap().0)
            .collect();

        // Newest first, each exactly once, terminal at the root.
        assert_eq!(
            walked,
            vec![digests[2].clone(), digests[1].clone(), digests[0].clone()]
        );
    }

    #[test]
    fn missing_parent_reports_corrupt_history() {
        let (_dir, objects) = store();
        let graph = CommitGraph::new(&objects);

        let missing = Digest::of_bytes(b"never stored");
        let orphan = commit(Some(&missing), "orphan");
        let tip = graph.write(&orphan).unwrap();

        let mut walk = graph.history(tip.clone());
        let (first, _) = walk.next().unwrap().unwrap();
        assert_eq!(first, tip);

        match walk.next().unwrap() {
            Err(RepoError::CorruptHistory { last_good, missing: m }) => {
                assert_eq!(last_good, Some(tip));
                assert_eq!(m, missing);
            }
            other => panic!("expected CorruptHistory, got {other:?}"),
        }
        assert!(walk.next().is_none());
    }

    #[test]
    fn is_ancestor_follows_the_chain() {
        let (_dir, objects) = store();
        let graph = CommitGraph::new(&objects);
        let digests = chain(&graph, 3);

        assert!(graph.is_ancestor(&digests[0], &digests[2]).unwrap());
        assert!(graph.is_ancestor(&digests[2], &digests[2]).unwrap());
        assert!(!graph.is_ancestor(&digests[2], &digests[0]).unwrap());
    }

    #[test]
    fn common_ancestor_of_diverged_chains() {
        let (_dir, objects) = store();
        let graph = CommitGraph::new(&objects);
        let base = chain(&graph, 2);

        let left = graph.write(&commit(Some(&base[1]), "left")).unwrap();
        let right = graph.write(&commit(Some(&base[1]), "right")).unwrap();

        assert_eq!(
            graph.common_ancestor(&left, &right).unwrap(),
            Some(base[1].clone())
        );
    }

    #[test]
    fn unrelated_roots_have_no_common_ancestor() {
        let (_dir, objects) = store();
        let graph = CommitGraph::new(&objects);

        let a = graph.write(&commit(None, "root a")).unwrap();
        let b = graph.write(&commit(None, "root b")).unwrap();

        assert_eq!(graph.common_ancestor(&a, &b).unwrap(), None);
    }

    #[test]
    fn corrupt_payload_is_reported_with_digest() {
        let (_dir, objects) = store();
        let graph = CommitGraph::new(&objects);

        let digest = objects.put(b"not a commit at all").unwrap();
        match graph.load(&digest) {
            Err(RepoError::CorruptCommit { digest: d, .. }) => assert_eq!(d, digest),
            other => panic!("expected CorruptCommit, got {other:?}"),
        }
    }
}
