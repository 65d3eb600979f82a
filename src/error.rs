//! Error types for burrow
//!
//! `ListError` is what a single directory listing can fail with.
//! `WalkError` is what a whole walk reports to its caller, after the
//! engine has decided whether a listing failure was on the root or
//! somewhere below it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of one directory listing call.
#[derive(Error, Debug)]
pub enum ListError {
    #[error("no such file or directory")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("not a directory")]
    NotADirectory,

    #[error(transparent)]
    Other(io::Error),
}

impl From<io::Error> for ListError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ListError::NotFound,
            io::ErrorKind::PermissionDenied => ListError::PermissionDenied,
            io::ErrorKind::NotADirectory => ListError::NotADirectory,
            _ => ListError::Other(err),
        }
    }
}

/// Terminal error of a walk.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("cannot access '{}': No such file or directory", .0.display())]
    RootNotFound(PathBuf),

    #[error("cannot walk '{}': Not a directory", .0.display())]
    RootNotADirectory(PathBuf),

    #[error("cannot read '{}': Permission denied", .0.display())]
    PermissionDenied(PathBuf),

    #[error("cannot read '{}': {source}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read directory '{}': {source}", .path.display())]
    SubdirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("walk cancelled")]
    Cancelled,

    /// The background context ended without reporting an outcome.
    #[error("background walk ended without a result: {0}")]
    WorkerLost(String),
}

impl WalkError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WalkError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_error_classification() {
        let e: ListError = io::Error::from(io::ErrorKind::NotFound).into();
        assert!(matches!(e, ListError::NotFound));

        let e: ListError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert!(matches!(e, ListError::PermissionDenied));

        let e: ListError = io::Error::from(io::ErrorKind::NotADirectory).into();
        assert!(matches!(e, ListError::NotADirectory));

        let e: ListError = io::Error::other("disk on fire").into();
        assert!(matches!(e, ListError::Other(_)));
    }

    #[test]
    fn test_walk_error_messages() {
        let e = WalkError::RootNotFound(PathBuf::from("/nope"));
        assert_eq!(
            e.to_string(),
            "cannot access '/nope': No such file or directory"
        );

        let e = WalkError::SubdirectoryUnreadable {
            path: PathBuf::from("/x/y"),
            source: io::Error::other("boom"),
        };
        assert_eq!(e.to_string(), "cannot read directory '/x/y': boom");
        assert!(WalkError::Cancelled.is_cancelled());
    }
}
