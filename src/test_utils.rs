//! Test utilities: temporary directory trees and an in-memory lister.
//!
//! This module is only compiled for tests and benchmarks.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use crate::entry::EntryType;
use crate::error::ListError;
use crate::walk::{Lister, RawEntry};

/// Relative paths of the sample tree, in creation order. Entries ending in
/// `/` are directories.
pub const SAMPLE_LAYOUT: &[&str] = &[
    "a",
    "foo/",
    "foo/b",
    "foo/c",
    "bar/",
    "bar/fuzz/",
    "bar/fuzz/d",
    "bar/fuzz/e",
    "bar/f",
    "bar/g",
    "h",
];

/// Non-directory entries of the sample tree, sorted.
pub const SAMPLE_FILES_SORTED: &[&str] = &[
    "a",
    "bar/f",
    "bar/fuzz/d",
    "bar/fuzz/e",
    "bar/g",
    "foo/b",
    "foo/c",
    "h",
];

/// A temporary directory tree on the real filesystem.
///
/// The directory is removed when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Tree with the sample layout (`a`, `foo/{b,c}`, `bar/{fuzz/{d,e},f,g}`, `h`).
    pub fn sample() -> Self {
        let tree = Self::new();
        for rel in SAMPLE_LAYOUT {
            match rel.strip_suffix('/') {
                Some(dir) => {
                    tree.add_dir(dir);
                }
                None => {
                    tree.add_file(rel, "");
                }
            }
        }
        tree
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Vanished,
    Denied,
    Broken,
}

/// Deterministic lister over an in-memory tree.
///
/// Children are listed in the order they were added. Clones share the call
/// counter.
#[derive(Debug, Clone)]
pub struct MemoryLister {
    root: PathBuf,
    listings: HashMap<PathBuf, Vec<RawEntry>>,
    non_dirs: HashSet<PathBuf>,
    failures: HashMap<PathBuf, Failure>,
    calls: Arc<AtomicUsize>,
}

impl MemoryLister {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut listings = HashMap::new();
        listings.insert(root.clone(), Vec::new());
        Self {
            root,
            listings,
            non_dirs: HashSet::new(),
            failures: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn entry(mut self, rel: &str, entry_type: EntryType) -> Self {
        let full = self.root.join(rel);
        let parent = full.parent().unwrap_or(&self.root).to_path_buf();
        let name = full.file_name().expect("entry needs a name").to_os_string();

        self.listings
            .entry(parent)
            .or_default()
            .push(RawEntry::new(name, entry_type));
        if entry_type == EntryType::Directory {
            self.listings.entry(full).or_default();
        } else {
            self.non_dirs.insert(full);
        }
        self
    }

    pub fn dir(self, rel: &str) -> Self {
        self.entry(rel, EntryType::Directory)
    }

    pub fn file(self, rel: &str) -> Self {
        self.entry(rel, EntryType::File)
    }

    /// Listing `rel` fails as if it was removed after being reported.
    pub fn vanish(self, rel: &str) -> Self {
        self.fail(rel, Failure::Vanished)
    }

    /// Listing `rel` fails with permission denied.
    pub fn deny(self, rel: &str) -> Self {
        self.fail(rel, Failure::Denied)
    }

    /// Listing `rel` fails with a generic I/O error.
    pub fn break_dir(self, rel: &str) -> Self {
        self.fail(rel, Failure::Broken)
    }

    fn fail(mut self, rel: &str, failure: Failure) -> Self {
        self.failures.insert(self.root.join(rel), failure);
        self
    }

    /// Number of `list` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Lister for MemoryLister {
    fn list(&self, dir: &Path) -> Result<Vec<RawEntry>, ListError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = self.failures.get(dir) {
            return Err(match failure {
                Failure::Vanished => ListError::NotFound,
                Failure::Denied => ListError::PermissionDenied,
                Failure::Broken => ListError::Other(io::Error::other("input/output error")),
            });
        }
        if let Some(children) = self.listings.get(dir) {
            return Ok(children.clone());
        }
        if self.non_dirs.contains(dir) {
            return Err(ListError::NotADirectory);
        }
        Err(ListError::NotFound)
    }
}

/// The sample layout as an in-memory tree rooted at `/root`.
pub fn sample_tree() -> MemoryLister {
    SAMPLE_LAYOUT
        .iter()
        .fold(MemoryLister::new("/root"), |lister, rel| {
            match rel.strip_suffix('/') {
                Some(dir) => lister.dir(dir),
                None => lister.file(rel),
            }
        })
}

/// A wide and deep in-memory tree: `fanout` children per directory, of
/// which the first `fanout / 2` are directories, down to `depth` levels.
pub fn generated_tree(fanout: usize, depth: usize) -> MemoryLister {
    fn fill(lister: MemoryLister, prefix: &str, fanout: usize, depth: usize) -> MemoryLister {
        let mut lister = lister;
        for i in 0..fanout {
            let rel = if prefix.is_empty() {
                format!("n{}", i)
            } else {
                format!("{}/n{}", prefix, i)
            };
            if i < fanout / 2 && depth > 1 {
                lister = lister.dir(&rel);
                lister = fill(lister, &rel, fanout, depth - 1);
            } else {
                lister = lister.file(&rel);
            }
        }
        lister
    }
    fill(MemoryLister::new("/gen"), "", fanout, depth)
}

/// Lister whose every call panics, for exercising background failure paths.
#[derive(Debug, Clone, Copy)]
pub struct PanickingLister;

impl Lister for PanickingLister {
    fn list(&self, _dir: &Path) -> Result<Vec<RawEntry>, ListError> {
        panic!("lister exploded");
    }
}
