//! Property-based tests for core domain types and codecs.
//!
//! These tests use proptest to verify invariants hold across randomly
//! generated inputs.

use std::collections::BTreeMap;

use proptest::prelude::*;

use stratum::core::paths::RepoPaths;
use stratum::core::types::{BranchName, Digest};
use stratum::graph::commit::Commit;
use stratum::store::index::{IndexEntry, StagingIndex};
use stratum::store::objects::ObjectStore;

/// Strategy for generating valid branch name characters.
fn branch_name_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        Just('-'),
        Just('_'),
        Just('.'),
    ]
}

/// Strategy for generating valid branch names.
fn valid_branch_name() -> impl Strategy<Value = String> {
    prop::collection::vec(branch_name_char(), 1..40).prop_filter_map(
        "must be valid branch name",
        |chars| {
            let name: String = chars.into_iter().collect();
            if name == "HEAD"
                || name.starts_with('.')
                || name.starts_with('-')
                || name.ends_with(".lock")
                || name.ends_with(".tmp")
                || name.contains("..")
            {
                None
            } else {
                Some(name)
            }
        },
    )
}

/// Strategy for paths the index format can frame: non-empty, no newline.
fn stageable_path() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_. /-]{1,30}".prop_filter("no leading/trailing space", |p| {
        !p.trim().is_empty()
    })
}

/// Strategy for commit entry lists with unique paths.
fn entry_list() -> impl Strategy<Value = Vec<IndexEntry>> {
    prop::collection::btree_map(stageable_path(), prop::collection::vec(any::<u8>(), 0..32), 0..8)
        .prop_map(|m| {
            m.into_iter()
                .map(|(path, content)| IndexEntry {
                    path,
                    digest: Digest::of_bytes(&content),
                })
                .collect()
        })
}

/// Strategy for whole commits. Entries are path-ordered, as produced by
/// a staging index snapshot.
fn commit_strategy() -> impl Strategy<Value = Commit> {
    (
        prop::option::of(prop::collection::vec(any::<u8>(), 0..16).prop_map(|b| Digest::of_bytes(&b))),
        any::<i64>(),
        "[ -~\n]{0,80}",
        entry_list(),
    )
        .prop_map(|(parent, timestamp, message, entries)| Commit {
            parent,
            timestamp,
            message,
            entries,
        })
}

proptest! {
    #[test]
    fn valid_branch_names_construct(name in valid_branch_name()) {
        let branch = BranchName::new(name.clone()).unwrap();
        prop_assert_eq!(branch.as_str(), name.as_str());
    }

    #[test]
    fn digest_hex_roundtrip(content in prop::collection::vec(any::<u8>(), 0..256)) {
        let digest = Digest::of_bytes(&content);
        prop_assert_eq!(digest.as_str().len(), Digest::HEX_LEN);
        prop_assert!(digest.as_str().chars().all(|c| c.is_ascii_hexdigit()));

        let reparsed = Digest::new(digest.as_str()).unwrap();
        prop_assert_eq!(reparsed, digest);
    }

    #[test]
    fn object_store_roundtrips_any_content(content in prop::collection::vec(any::<u8>(), 0..512)) {
        let dir = tempfile::tempdir().unwrap();
        let paths = RepoPaths::new(dir.path());
        std::fs::create_dir_all(paths.objects_dir()).unwrap();
        let store = ObjectStore::new(paths);

        let digest = store.put(&content).unwrap();
        prop_assert_eq!(store.get(&digest).unwrap(), content.clone());

        // Second put of the same bytes is a no-op with the same address.
        prop_assert_eq!(store.put(&content).unwrap(), digest);
    }

    #[test]
    fn commit_codec_roundtrips(commit in commit_strategy()) {
        let encoded = commit.encode();
        let decoded = Commit::decode(&encoded).unwrap();
        prop_assert_eq!(&decoded, &commit);

        // Canonical: re-encoding is byte-identical, so digests agree.
        prop_assert_eq!(decoded.encode(), encoded);
        prop_assert_eq!(decoded.digest(), commit.digest());
    }

    #[test]
    fn index_is_last_write_wins_and_ordered(
        writes in prop::collection::vec((stageable_path(), prop::collection::vec(any::<u8>(), 0..16)), 1..20)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let paths = RepoPaths::new(dir.path());
        std::fs::create_dir_all(paths.repo_dir()).unwrap();
        let mut index = StagingIndex::load(paths).unwrap();

        let mut expected: BTreeMap<String, Digest> = BTreeMap::new();
        for (path, content) in &writes {
            let digest = Digest::of_bytes(content);
            index.stage(path, digest.clone()).unwrap();
            expected.insert(path.clone(), digest);
        }

        let snapshot = index.snapshot();
        prop_assert_eq!(snapshot.len(), expected.len());

        // Path-lexicographic order with the final digest for each path.
        let mut last: Option<&str> = None;
        for entry in &snapshot {
            if let Some(prev) = last {
                prop_assert!(prev < entry.path.as_str());
            }
            prop_assert_eq!(Some(&entry.digest), expected.get(&entry.path));
            last = Some(entry.path.as_str());
        }
    }
}
