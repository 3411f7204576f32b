//! merge
//!
//! Three-way merge resolution between two branch tips.
//!
//! # Architecture
//!
//! The engine first checks the cheap cases (equal tips, one tip contained
//! in the other's history), then falls back to a three-way comparison
//! against the nearest common ancestor. Every path present in the
//! ancestor, current, or other snapshot is classified as unchanged,
//! changed only in one side, or changed in both sides to different
//! content. The last class is a conflict.
//!
//! Conflicts are a first-class outcome, not an error: the engine reports
//! the conflicting path set and creates nothing; the caller resolves and
//! commits manually.
//!
//! Deletion counts as a change (an absent path differs from every
//! digest), so modify-versus-delete conflicts are detected. Both sides
//! deleting the same path is the same change, not a conflict.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::errors::RepoError;
use crate::core::types::Digest;
use crate::graph::commit::Commit;
use crate::graph::CommitGraph;
use crate::store::index::IndexEntry;
use crate::store::objects::ObjectStore;

/// Result of merging one branch tip into another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// The current tip already contains the other tip's history.
    AlreadyUpToDate,

    /// The current tip is an ancestor of the other tip; the branch can
    /// simply advance. No new commit object is created.
    FastForward { new_tip: Digest },

    /// Divergent histories reconciled cleanly; a merge commit was
    /// written with the current tip as its parent.
    Merged { new_commit: Digest },

    /// One or more paths changed in both sides to different content.
    /// Nothing was written.
    Conflict { paths: BTreeSet<String> },
}

/// Three-way merge engine over a commit graph.
#[derive(Debug, Clone, Copy)]
pub struct MergeEngine<'a> {
    graph: CommitGraph<'a>,
}

impl<'a> MergeEngine<'a> {
    /// Create an engine over an object store.
    pub fn new(objects: &'a ObjectStore) -> Self {
        Self {
            graph: CommitGraph::new(objects),
        }
    }

    /// Merge `other_tip` into `current_tip`.
    ///
    /// When the histories diverge and reconcile cleanly, a merge commit
    /// is written with `message` and `timestamp`, parented on
    /// `current_tip` (single-parent model: the other side's contribution
    /// lives in the recomputed snapshot, not in a second parent link).
    ///
    /// The caller is responsible for advancing the branch ref according
    /// to the returned outcome.
    pub fn merge(
        &self,
        current_tip: &Digest,
        other_tip: &Digest,
        message: &str,
        timestamp: i64,
    ) -> Result<MergeOutcome, RepoError> {
        if current_tip == other_tip {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }
        if self.graph.is_ancestor(other_tip, current_tip)? {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }
        if self.graph.is_ancestor(current_tip, other_tip)? {
            return Ok(MergeOutcome::FastForward {
                new_tip: other_tip.clone(),
            });
        }

        // Divergent histories: three-way comparison against the nearest
        // common ancestor. No shared root degenerates to an empty base,
        // so every path counts as changed in the side that has it.
        let base = match self.graph.common_ancestor(current_tip, other_tip)? {
            Some(ancestor) => self.graph.load(&ancestor)?.entry_map(),
            None => BTreeMap::new(),
        };
        let current = self.graph.load(current_tip)?.entry_map();
        let other = self.graph.load(other_tip)?.entry_map();

        let (snapshot, conflicts) = three_way(&base, &current, &other);
        if !conflicts.is_empty() {
            return Ok(MergeOutcome::Conflict { paths: conflicts });
        }

        let commit = Commit {
            parent: Some(current_tip.clone()),
            timestamp,
            message: message.to_string(),
            entries: snapshot
                .into_iter()
                .map(|(path, digest)| IndexEntry { path, digest })
                .collect(),
        };
        let new_commit = self.graph.write(&commit)?;
        Ok(MergeOutcome::Merged { new_commit })
    }
}

/// Classify every path across the three snapshots and synthesize the
/// merged snapshot. Returns the snapshot and the set of conflicting
/// paths; the snapshot is only meaningful when the conflict set is empty.
fn three_way(
    base: &BTreeMap<String, Digest>,
    current: &BTreeMap<String, Digest>,
    other: &BTreeMap<String, Digest>,
) -> (BTreeMap<String, Digest>, BTreeSet<String>) {
    let mut paths: BTreeSet<&String> = BTreeSet::new();
    paths.extend(base.keys());
    paths.extend(current.keys());
    paths.extend(other.keys());

    let mut snapshot = BTreeMap::new();
    let mut conflicts = BTreeSet::new();

    for path in paths {
        let base_d = base.get(path);
        let current_d = current.get(path);
        let other_d = other.get(path);

        let current_changed = current_d != base_d;
        let other_changed = other_d != base_d;

        let resolved = match (current_changed, other_changed) {
            (false, false) => current_d,
            (true, false) => current_d,
            (false, true) => other_d,
            (true, true) => {
                // Same change on both sides is not a conflict; this also
                // covers both sides deleting the path.
                if current_d == other_d {
                    current_d
                } else {
                    conflicts.insert(path.clone());
                    continue;
                }
            }
        };

        if let Some(digest) = resolved {
            snapshot.insert(path.clone(), digest.clone());
        }
    }

    (snapshot, conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(content: &str) -> Digest {
        Digest::of_bytes(content.as_bytes())
    }

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, Digest> {
        pairs
            .iter()
            .map(|(path, content)| (path.to_string(), d(content)))
            .collect()
    }

    #[test]
    fn disjoint_additions_merge_cleanly() {
        let base = map(&[("a.txt", "A")]);
        let current = map(&[("a.txt", "A"), ("b.txt", "B")]);
        let other = map(&[("a.txt", "A"), ("c.txt", "C")]);

        let (snapshot, conflicts) = three_way(&base, &current, &other);
        assert!(conflicts.is_empty());
        assert_eq!(
            snapshot,
            map(&[("a.txt", "A"), ("b.txt", "B"), ("c.txt", "C")])
        );
    }

    #[test]
    fn both_sides_changing_differently_conflicts() {
        let base = map(&[("f.txt", "A")]);
        let current = map(&[("f.txt", "B")]);
        let other = map(&[("f.txt", "C")]);

        let (_, conflicts) = three_way(&base, &current, &other);
        assert_eq!(conflicts, BTreeSet::from(["f.txt".to_string()]));
    }

    #[test]
    fn identical_change_on_both_sides_is_not_a_conflict() {
        let base = map(&[("f.txt", "A")]);
        let current = map(&[("f.txt", "B")]);
        let other = map(&[("f.txt", "B")]);

        let (snapshot, conflicts) = three_way(&base, &current, &other);
        assert!(conflicts.is_empty());
        assert_eq!(snapshot, map(&[("f.txt", "B")]));
    }

    #[test]
    fn deletion_in_one_side_wins_when_other_is_unchanged() {
        let base = map(&[("f.txt", "A"), ("keep.txt", "K")]);
        let current = map(&[("f.txt", "A"), ("keep.txt", "K")]);
        let other = map(&[("keep.txt", "K")]);

        let (snapshot, conflicts) = three_way(&base, &current, &other);
        assert!(conflicts.is_empty());
        assert_eq!(snapshot, map(&[("keep.txt", "K")]));
    }

    #[test]
    fn modify_versus_delete_conflicts() {
        let base = map(&[("f.txt", "A")]);
        let current = map(&[("f.txt", "B")]);
        let other = map(&[]);

        let (_, conflicts) = three_way(&base, &current, &other);
        assert_eq!(conflicts, BTreeSet::from(["f.txt".to_string()]));
    }

    #[test]
    fn both_deleting_is_not_a_conflict() {
        let base = map(&[("f.txt", "A")]);
        let current = map(&[]);
        let other = map(&[]);

        let (snapshot, conflicts) = three_way(&base, &current, &other);
        assert!(conflicts.is_empty());
        assert!(snapshot.is_empty());
    }
}
