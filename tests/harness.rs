//! Test harness for burrow integration tests

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

pub use burrow::test_utils::{SAMPLE_FILES_SORTED, SAMPLE_LAYOUT, TestTree};

/// Every relative path in the sample tree, sorted.
pub fn sample_paths_sorted() -> Vec<String> {
    let mut paths: Vec<String> = SAMPLE_LAYOUT
        .iter()
        .map(|p| p.trim_end_matches('/').to_string())
        .collect();
    paths.sort();
    paths
}

pub fn run_burrow(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_burrow");
    let output = Command::new(binary)
        .args(args)
        .current_dir(dir)
        .env_remove("FORCE_COLOR")
        .env_remove("BURROW_LOG")
        .output()
        .expect("Failed to run burrow");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

/// Output lines, sorted.
pub fn sorted_lines(stdout: &str) -> Vec<String> {
    let mut lines: Vec<String> = stdout.lines().map(str::to_string).collect();
    lines.sort();
    lines
}

/// Number of path components, 1 for direct children of the root.
pub fn depth_of(path: &str) -> usize {
    path.split('/').count()
}

/// True when every directory in `dirs` is followed directly by all of its
/// descendants and nothing else, as depth-first pre-order requires.
pub fn descendants_follow<S: AsRef<str>>(order: &[S], dirs: &[&str]) -> bool {
    dirs.iter().all(|dir| {
        let prefix = format!("{}/", dir);
        let Some(at) = order.iter().position(|p| p.as_ref() == *dir) else {
            return false;
        };
        let count = order
            .iter()
            .filter(|p| p.as_ref().starts_with(&prefix))
            .count();
        order
            .iter()
            .skip(at + 1)
            .take(count)
            .filter(|p| p.as_ref().starts_with(&prefix))
            .count()
            == count
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_sample_tree() {
        let tree = TestTree::sample();
        assert!(tree.path().join("bar/fuzz/e").is_file());
        assert!(tree.path().join("foo").is_dir());
        assert_eq!(sample_paths_sorted().len(), 11);
    }

    #[test]
    fn test_harness_preorder_check() {
        assert!(descendants_follow(&["a", "x", "x/1", "x/2", "b"], &["x"]));
        assert!(!descendants_follow(&["x", "b", "x/1", "x/2"], &["x"]));
        assert!(!descendants_follow(&["a", "b"], &["x"]));
    }
}
