//! Edge case tests for burrow

mod harness;

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::{PermissionsExt, symlink};

use burrow::{Delivery, EntryType, OutputType, WalkError, WalkRequest, Walker};
use harness::{TestTree, run_burrow, sorted_lines};

/// Type label and path of every `--types` line.
fn typed_lines(stdout: &str) -> Vec<(String, String)> {
    let mut lines: Vec<(String, String)> = stdout
        .lines()
        .filter_map(|line| {
            let (label, path) = line.split_once(' ')?;
            Some((label.to_string(), path.trim_start().to_string()))
        })
        .collect();
    lines.sort_by(|a, b| a.1.cmp(&b.1));
    lines
}

fn entry_type_of(tree: &TestTree, rel: &str) -> Option<EntryType> {
    let walked = Walker::new(WalkRequest {
        output_type: OutputType::Entries,
        ..WalkRequest::new(tree.path())
    })
    .walk()
    .unwrap();
    walked
        .into_listing()
        .unwrap()
        .entries()
        .unwrap()
        .iter()
        .find(|e| e.relative_path() == rel)
        .map(|e| e.entry_type())
}

// ============================================================================
// Symlinks
// ============================================================================

#[test]
#[cfg(unix)]
fn test_symlink_to_file() {
    let tree = TestTree::new();
    let target = tree.add_file("target.txt", "data");
    symlink(&target, tree.path().join("link.txt")).expect("Failed to create symlink");

    let (stdout, _stderr, success) = run_burrow(tree.path(), &["--types"]);
    assert!(success);
    assert_eq!(
        typed_lines(&stdout),
        vec![
            ("symlink".to_string(), "link.txt".to_string()),
            ("file".to_string(), "target.txt".to_string()),
        ]
    );
}

#[test]
#[cfg(unix)]
fn test_symlink_to_directory_not_followed() {
    let tree = TestTree::new();
    let real = tree.add_dir("realdir");
    tree.add_file("realdir/inside.txt", "");
    symlink(&real, tree.path().join("linkdir")).expect("Failed to create symlink");

    let (stdout, _stderr, success) = run_burrow(tree.path(), &[]);
    assert!(success);
    assert_eq!(
        sorted_lines(&stdout),
        vec!["linkdir", "realdir", "realdir/inside.txt"]
    );
    assert_eq!(entry_type_of(&tree, "linkdir"), Some(EntryType::Symlink));
}

#[test]
#[cfg(unix)]
fn test_symlink_to_parent_no_infinite_loop() {
    let tree = TestTree::new();
    tree.add_file("subdir/file.txt", "");
    symlink("..", tree.path().join("subdir/up")).expect("Failed to create symlink");

    let (stdout, _stderr, success) = run_burrow(tree.path(), &["-a", "bfs"]);
    assert!(success, "burrow should not loop on cyclic symlinks");
    assert_eq!(
        sorted_lines(&stdout),
        vec!["subdir", "subdir/file.txt", "subdir/up"]
    );
}

#[test]
#[cfg(unix)]
fn test_broken_symlink() {
    let tree = TestTree::new();
    symlink("nowhere", tree.path().join("dangling")).expect("Failed to create symlink");

    let (stdout, _stderr, success) = run_burrow(tree.path(), &[]);
    assert!(success, "a dangling symlink is still an entry");
    assert_eq!(stdout, "dangling\n");
}

// ============================================================================
// Special files
// ============================================================================

#[test]
#[cfg(unix)]
fn test_socket_entry() {
    use std::os::unix::net::UnixListener;

    let tree = TestTree::new();
    let _listener = UnixListener::bind(tree.path().join("sock")).expect("Failed to bind socket");

    assert_eq!(entry_type_of(&tree, "sock"), Some(EntryType::Socket));

    let (stdout, _stderr, success) = run_burrow(tree.path(), &["--types", "--summary"]);
    assert!(success);
    assert!(stdout.starts_with("socket  sock\n"), "{}", stdout);
    assert!(stdout.contains("0 directories, 0 files, 1 other"), "{}", stdout);
}

#[test]
#[cfg(unix)]
fn test_fifo_entry() {
    let tree = TestTree::new();
    let status = std::process::Command::new("mkfifo")
        .arg(tree.path().join("pipe"))
        .status();

    // mkfifo is not available everywhere
    if !status.map(|s| s.success()).unwrap_or(false) {
        return;
    }

    assert_eq!(entry_type_of(&tree, "pipe"), Some(EntryType::Fifo));
    let (stdout, _stderr, success) = run_burrow(tree.path(), &["--types"]);
    assert!(success);
    assert_eq!(stdout, "fifo    pipe\n");
}

#[test]
#[cfg(unix)]
fn test_char_device_root() {
    let dev = std::path::Path::new("/dev");
    if !dev.join("null").exists() {
        return;
    }

    let walked = Walker::new(WalkRequest {
        output_type: OutputType::Entries,
        delivery: Delivery::Streamed,
        ..WalkRequest::new(dev)
    })
    .walk()
    .unwrap();

    // /dev may hold unreadable subdirectories; only the top level matters here
    let null = walked
        .into_stream()
        .unwrap()
        .map_while(Result::ok)
        .find(|item| item.relative_path() == "null");
    if let Some(item) = null {
        assert!(item.as_entry().unwrap().is_char_device());
    }
}

// ============================================================================
// Permissions
// ============================================================================

#[test]
#[cfg(unix)]
fn test_unreadable_directory() {
    let tree = TestTree::new();
    tree.add_file("readable/file.txt", "");
    let unreadable = tree.add_dir("unreadable");
    fs::write(unreadable.join("hidden.txt"), "").expect("Failed to write file");

    fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o000))
        .expect("Failed to set permissions");
    let restricted = fs::read_dir(&unreadable).is_err();

    let (stdout, stderr, success) = run_burrow(tree.path(), &["--stream"]);

    // Restore permissions for cleanup
    fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o755))
        .expect("Failed to restore permissions");

    if !restricted {
        // Running as root: permission bits are not enforced
        assert!(success);
        return;
    }

    assert!(!success, "an unreadable subdirectory ends the walk");
    assert!(stderr.contains("Permission denied"), "{}", stderr);
    assert!(stderr.contains("unreadable"), "{}", stderr);
    assert!(stdout.lines().any(|l| l == "unreadable"), "{}", stdout);
    assert!(!stdout.contains("hidden.txt"));
}

#[test]
#[cfg(unix)]
fn test_unreadable_root() {
    let tree = TestTree::new();
    let root = tree.add_dir("locked");
    tree.add_file("locked/secret.txt", "");

    fs::set_permissions(&root, fs::Permissions::from_mode(0o000))
        .expect("Failed to set permissions");
    let restricted = fs::read_dir(&root).is_err();
    let outcome = Walker::new(WalkRequest::new(&root)).walk();
    fs::set_permissions(&root, fs::Permissions::from_mode(0o755))
        .expect("Failed to restore permissions");

    if restricted {
        assert!(matches!(outcome, Err(WalkError::PermissionDenied(p)) if p == root));
    } else {
        assert!(outcome.is_ok());
    }
}

// ============================================================================
// Names
// ============================================================================

#[test]
fn test_filename_with_spaces() {
    let tree = TestTree::new();
    tree.add_file("file with spaces.txt", "");
    tree.add_file("dir with spaces/nested.txt", "");

    let (stdout, _stderr, success) = run_burrow(tree.path(), &[]);
    assert!(success);
    assert_eq!(
        sorted_lines(&stdout),
        vec![
            "dir with spaces",
            "dir with spaces/nested.txt",
            "file with spaces.txt"
        ]
    );
}

#[test]
fn test_filename_with_unicode() {
    let tree = TestTree::new();
    tree.add_file("日本語.txt", "");
    tree.add_file("émoji_🎉.txt", "");
    tree.add_file("中文目录/文件.txt", "");

    let (stdout, _stderr, success) = run_burrow(tree.path(), &[]);
    assert!(success);
    assert!(stdout.contains("日本語.txt"));
    assert!(stdout.contains("émoji_🎉.txt"));
    assert!(stdout.contains("中文目录/文件.txt"));
}

#[test]
fn test_filename_with_newline_needs_null_delimiter() {
    let tree = TestTree::new();
    tree.add_file("two\nlines", "");

    let (stdout, _stderr, success) = run_burrow(tree.path(), &["-0"]);
    assert!(success);
    assert_eq!(stdout, "two\nlines\0");
}

#[test]
fn test_hidden_entries_reported() {
    let tree = TestTree::new();
    tree.add_file(".hidden", "");
    tree.add_file(".config/settings", "");

    let (stdout, _stderr, success) = run_burrow(tree.path(), &[]);
    assert!(success);
    assert_eq!(
        sorted_lines(&stdout),
        vec![".config", ".config/settings", ".hidden"]
    );
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn test_empty_root() {
    let tree = TestTree::new();

    let (stdout, _stderr, success) = run_burrow(tree.path(), &[]);
    assert!(success);
    assert!(stdout.is_empty());

    let (stdout, _stderr, success) = run_burrow(tree.path(), &["--json"]);
    assert!(success);
    assert_eq!(stdout.trim(), "[]");
}

#[test]
fn test_empty_subdirectories() {
    let tree = TestTree::new();
    tree.add_dir("a/b/c");

    let (stdout, _stderr, success) = run_burrow(tree.path(), &["-a", "bfs"]);
    assert!(success);
    assert_eq!(stdout, "a\na/b\na/b/c\n");
}

#[test]
fn test_deep_tree() {
    let tree = TestTree::new();
    let rel = vec!["d"; 200].join("/");
    tree.add_file(&format!("{}/leaf", rel), "");

    let (stdout, _stderr, success) = run_burrow(tree.path(), &["--stream"]);
    assert!(success);
    assert_eq!(stdout.lines().count(), 201);
    assert!(stdout.lines().last().unwrap().ends_with("/d/leaf"));
}

#[test]
fn test_wide_directory_with_small_buffer() {
    let tree = TestTree::new();
    for i in 0..1000 {
        tree.add_file(&format!("wide/f{:04}", i), "");
    }

    let (stdout, _stderr, success) =
        run_burrow(tree.path(), &["--stream", "--async", "--capacity", "1"]);
    assert!(success);
    assert_eq!(stdout.lines().count(), 1001);
}

#[test]
fn test_zero_capacity_is_clamped() {
    let tree = TestTree::sample();

    let (stdout, _stderr, success) =
        run_burrow(tree.path(), &["--stream", "--async", "--capacity", "0"]);
    assert!(success);
    assert_eq!(stdout.lines().count(), 11);
}
