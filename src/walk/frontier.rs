//! Pending-entry frontier with a selectable discipline.
//!
//! One `VecDeque` serves both algorithms: depth-first uses it as a stack,
//! breadth-first as a queue. Walking this way keeps the native call stack
//! flat no matter how deep the tree goes.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::entry::DirectoryEntry;

use super::config::Algorithm;

/// A directory due to be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierNode {
    pub path: PathBuf,
    /// Root-relative path; empty for the root itself
    pub relative: String,
    pub depth: usize,
}

impl FrontierNode {
    pub fn root(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            relative: String::new(),
            depth: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

impl From<&DirectoryEntry> for FrontierNode {
    fn from(entry: &DirectoryEntry) -> Self {
        Self {
            path: entry.path().to_path_buf(),
            relative: entry.relative_path().to_string(),
            depth: entry.depth(),
        }
    }
}

/// Entries waiting to be handed out.
///
/// Depth-first pops the most recently pushed entry, breadth-first the
/// oldest. A directory's children are pushed right after the directory
/// itself has been handed out, which gives pre-order for the stack and
/// level order for the queue.
#[derive(Debug)]
pub struct Frontier {
    algorithm: Algorithm,
    entries: VecDeque<DirectoryEntry>,
}

impl Frontier {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            entries: VecDeque::new(),
        }
    }

    /// Add the children of a directory that was just listed, given in
    /// listing order.
    pub fn push_children(&mut self, children: Vec<DirectoryEntry>) {
        match self.algorithm {
            // Reversed so the leftmost child sits on top of the stack.
            Algorithm::DepthFirst => self.entries.extend(children.into_iter().rev()),
            Algorithm::BreadthFirst => self.entries.extend(children),
        }
    }

    pub fn pop(&mut self) -> Option<DirectoryEntry> {
        match self.algorithm {
            Algorithm::DepthFirst => self.entries.pop_back(),
            Algorithm::BreadthFirst => self.entries.pop_front(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
