//! Traversal engine: a lazy, pull-based walk over a frontier.
//!
//! `Traversal` never spawns or blocks on anything except the lister, so the
//! same engine runs on the caller's thread or inside any background context.

use std::iter::FusedIterator;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::entry::DirectoryEntry;
use crate::error::{ListError, WalkError};

use super::config::Algorithm;
use super::frontier::{Frontier, FrontierNode};
use super::lister::{Lister, list_children};

/// Shared flag that stops a walk before its next listing call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    /// Nothing pulled yet
    Idle,
    /// A listing call is in progress
    Expanding,
    /// Last call handed out an entry
    Yielding,
    Done,
    Failed,
}

/// Lazy walk below a root directory.
///
/// Yields every entry under the root exactly once, in the order dictated by
/// the algorithm. A directory is listed on the pull after it was yielded, so
/// at most one listing call happens per `next()`. After an error the
/// iterator is exhausted; entries handed out before it stay valid.
pub struct Traversal<L> {
    lister: L,
    frontier: Frontier,
    /// Directory to list before anything else is handed out
    due: Option<FrontierNode>,
    state: TraversalState,
    cancel: Option<CancelToken>,
    dirs_listed: usize,
    produced: usize,
}

impl<L: Lister> Traversal<L> {
    pub fn new(root: &Path, algorithm: Algorithm, lister: L) -> Self {
        Self {
            lister,
            frontier: Frontier::new(algorithm),
            due: Some(FrontierNode::root(root)),
            state: TraversalState::Idle,
            cancel: None,
            dirs_listed: 0,
            produced: 0,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// Number of directories listed so far, root included.
    pub fn dirs_listed(&self) -> usize {
        self.dirs_listed
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    fn expand(&mut self, node: FrontierNode) -> Result<(), WalkError> {
        self.state = TraversalState::Expanding;

        let children = match list_children(&self.lister, &node) {
            Ok(children) => children,
            Err(err) => return classify_failure(&node, err),
        };
        self.dirs_listed += 1;

        debug!(
            path = %node.path.display(),
            depth = node.depth,
            children = children.len(),
            "listed directory"
        );

        self.frontier.push_children(children);
        Ok(())
    }

    fn fail(&mut self, err: WalkError) -> Option<Result<DirectoryEntry, WalkError>> {
        self.state = TraversalState::Failed;
        self.due = None;
        self.frontier.clear();
        debug!(error = %err, produced = self.produced, "walk failed");
        Some(Err(err))
    }
}

/// Decide what a failed listing means for the walk.
///
/// Any failure on the root is fatal. Below the root, a directory that has
/// disappeared or stopped being a directory since it was listed is skipped;
/// every other failure ends the walk.
fn classify_failure(node: &FrontierNode, err: ListError) -> Result<(), WalkError> {
    let path = node.path.clone();

    if node.is_root() {
        return Err(match err {
            ListError::NotFound => WalkError::RootNotFound(path),
            ListError::NotADirectory => WalkError::RootNotADirectory(path),
            ListError::PermissionDenied => WalkError::PermissionDenied(path),
            ListError::Other(source) => WalkError::RootUnreadable { path, source },
        });
    }

    match err {
        ListError::NotFound | ListError::NotADirectory => {
            warn!(path = %path.display(), reason = %err, "directory changed during walk, skipping");
            Ok(())
        }
        ListError::PermissionDenied => Err(WalkError::PermissionDenied(path)),
        ListError::Other(source) => Err(WalkError::SubdirectoryUnreadable { path, source }),
    }
}

impl<L: Lister> Iterator for Traversal<L> {
    type Item = Result<DirectoryEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if matches!(self.state, TraversalState::Done | TraversalState::Failed) {
                return None;
            }
            if self.is_cancelled() {
                return self.fail(WalkError::Cancelled);
            }

            if let Some(node) = self.due.take() {
                if let Err(err) = self.expand(node) {
                    return self.fail(err);
                }
                continue;
            }

            let Some(entry) = self.frontier.pop() else {
                self.state = TraversalState::Done;
                debug!(
                    dirs_listed = self.dirs_listed,
                    produced = self.produced,
                    "walk complete"
                );
                return None;
            };

            if entry.is_dir() {
                self.due = Some(FrontierNode::from(&entry));
            }
            self.state = TraversalState::Yielding;
            self.produced += 1;
            return Some(Ok(entry));
        }
    }
}

impl<L: Lister> FusedIterator for Traversal<L> {}
