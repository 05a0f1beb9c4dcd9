// tests/change_detection_props.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use proptest::prelude::*;
use proptest::sample::Index;

use autobuild::fs::mock::MockFileSystem;
use autobuild::watch::{changed, PathFilter, Snapshot};

fn at(nanos: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_nanos(nanos)
}

fn to_snapshot(files: &HashMap<String, u64>) -> Snapshot {
    files
        .iter()
        .map(|(name, t)| (PathBuf::from(format!("/w/{name}")), at(*t)))
        .collect()
}

fn files_strategy(min: usize) -> impl Strategy<Value = HashMap<String, u64>> {
    proptest::collection::hash_map("[a-z]{1,6}(/[a-z]{1,4}){0,2}", 0u64..1_000_000_000, min..20)
}

// Relative file paths whose directory segments are sometimes hidden.
fn tree_strategy() -> impl Strategy<Value = Vec<String>> {
    let segment = prop_oneof![
        3 => "[a-z]{1,5}",
        1 => "\\.[a-z]{1,5}",
    ];
    let file = (proptest::collection::vec(segment, 0..4), "[a-z][a-z.]{0,5}").prop_map(
        |(dirs, name)| {
            let mut parts = dirs;
            parts.push(name);
            parts.join("/")
        },
    );
    proptest::collection::vec(file, 0..25)
}

proptest! {
    #[test]
    fn snapshot_is_never_changed_against_itself(files in files_strategy(0)) {
        let s = to_snapshot(&files);
        prop_assert!(!changed(&s, &s));
        prop_assert!(!changed(&s, &s.clone()));
    }

    #[test]
    fn insertion_order_does_not_matter(files in files_strategy(0)) {
        let forward = to_snapshot(&files);
        let mut entries: Vec<_> = files.iter().collect();
        entries.sort();
        entries.reverse();
        let backward: Snapshot = entries
            .into_iter()
            .map(|(name, t)| (PathBuf::from(format!("/w/{name}")), at(*t)))
            .collect();

        prop_assert!(!changed(&forward, &backward));
        prop_assert!(!changed(&backward, &forward));
    }

    #[test]
    fn adding_a_path_is_a_change(files in files_strategy(0), extra in "[A-Z]{1,6}", t in 0u64..1_000) {
        // Upper-case names never collide with the generated lower-case ones.
        let old = to_snapshot(&files);
        let mut grown = files.clone();
        grown.insert(extra, t);
        let new = to_snapshot(&grown);

        prop_assert!(changed(&old, &new));
        prop_assert!(changed(&new, &old));
    }

    #[test]
    fn removing_a_path_is_a_change(files in files_strategy(1), pick in any::<Index>()) {
        let old = to_snapshot(&files);
        let mut keys: Vec<&String> = files.keys().collect();
        keys.sort();
        let victim = keys[pick.index(keys.len())].clone();

        let mut shrunk = files.clone();
        shrunk.remove(&victim);
        let new = to_snapshot(&shrunk);

        prop_assert!(changed(&old, &new));
    }

    #[test]
    fn smallest_timestamp_bump_is_a_change(files in files_strategy(1), pick in any::<Index>()) {
        let old = to_snapshot(&files);
        let mut keys: Vec<&String> = files.keys().collect();
        keys.sort();
        let victim = keys[pick.index(keys.len())].clone();

        let mut bumped = files.clone();
        *bumped.get_mut(&victim).unwrap() += 1;
        let new = to_snapshot(&bumped);

        prop_assert!(changed(&old, &new));
    }

    #[test]
    fn diff_agrees_with_changed(a in files_strategy(0), b in files_strategy(0)) {
        let a = to_snapshot(&a);
        let b = to_snapshot(&b);
        prop_assert_eq!(changed(&a, &b), !a.diff(&b).is_empty());
    }

    #[test]
    fn capture_never_enters_hidden_directories(tree in tree_strategy()) {
        let fs = MockFileSystem::new();
        let root = Path::new("/game");
        fs.add_dir(root);
        for rel in &tree {
            fs.add_file(root.join(rel), at(1));
        }

        let snapshot = Snapshot::capture(&fs, root, &PathFilter::default());

        for path in snapshot.paths() {
            let rel = path.strip_prefix(root).unwrap();
            let dirs: Vec<_> = rel.parent().into_iter().flat_map(|p| p.components()).collect();
            for dir in dirs {
                prop_assert!(
                    !dir.as_os_str().to_string_lossy().starts_with('.'),
                    "{:?} is under a hidden directory",
                    path
                );
            }
        }
    }
}
