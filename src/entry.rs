//! Directory entry records produced by a walk

use std::fmt;
use std::fs::FileType;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Type of a filesystem entry, as reported by the directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    File,
    Directory,
    Symlink,
    Socket,
    BlockDevice,
    CharDevice,
    Fifo,
    Unknown,
}

impl EntryType {
    /// Classify a `FileType` without following symlinks.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            return EntryType::Symlink;
        }
        if file_type.is_dir() {
            return EntryType::Directory;
        }
        if file_type.is_file() {
            return EntryType::File;
        }
        Self::from_special(file_type)
    }

    #[cfg(unix)]
    fn from_special(file_type: FileType) -> Self {
        use std::os::unix::fs::FileTypeExt;

        if file_type.is_socket() {
            EntryType::Socket
        } else if file_type.is_block_device() {
            EntryType::BlockDevice
        } else if file_type.is_char_device() {
            EntryType::CharDevice
        } else if file_type.is_fifo() {
            EntryType::Fifo
        } else {
            EntryType::Unknown
        }
    }

    #[cfg(not(unix))]
    fn from_special(_file_type: FileType) -> Self {
        EntryType::Unknown
    }

    /// Short lowercase label used in text output.
    pub fn label(&self) -> &'static str {
        match self {
            EntryType::File => "file",
            EntryType::Directory => "dir",
            EntryType::Symlink => "symlink",
            EntryType::Socket => "socket",
            EntryType::BlockDevice => "block",
            EntryType::CharDevice => "char",
            EntryType::Fifo => "fifo",
            EntryType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry discovered under the walk root.
///
/// Records are immutable once built by the lister. The type comes straight
/// from the directory listing, so the predicates below never touch the
/// filesystem again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    name: String,
    relative_path: String,
    #[serde(rename = "type")]
    entry_type: EntryType,
    depth: usize,
    #[serde(skip)]
    path: PathBuf,
}

impl DirectoryEntry {
    pub(crate) fn new(
        name: String,
        relative_path: String,
        entry_type: EntryType,
        depth: usize,
        path: PathBuf,
    ) -> Self {
        Self {
            name,
            relative_path,
            entry_type,
            depth,
            path,
        }
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path relative to the walk root, always `/`-separated.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// Distance from the root; direct children of the root are at depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Full filesystem path (root joined with the raw, undecoded name).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.entry_type == EntryType::Symlink
    }

    pub fn is_socket(&self) -> bool {
        self.entry_type == EntryType::Socket
    }

    pub fn is_block_device(&self) -> bool {
        self.entry_type == EntryType::BlockDevice
    }

    pub fn is_char_device(&self) -> bool {
        self.entry_type == EntryType::CharDevice
    }

    pub fn is_fifo(&self) -> bool {
        self.entry_type == EntryType::Fifo
    }
}
