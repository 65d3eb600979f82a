//! Directory listing primitive and its adaptation into entry records.

use std::ffi::OsString;
use std::fs::FileType;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::entry::{DirectoryEntry, EntryType};
use crate::error::ListError;

use super::frontier::FrontierNode;

/// One raw child as reported by the listing primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: OsString,
    pub entry_type: EntryType,
}

impl RawEntry {
    pub fn new(name: impl Into<OsString>, entry_type: EntryType) -> Self {
        Self {
            name: name.into(),
            entry_type,
        }
    }
}

/// Lists the immediate children of one directory.
///
/// Children are returned in whatever order the source produces them.
pub trait Lister {
    fn list(&self, dir: &Path) -> Result<Vec<RawEntry>, ListError>;
}

impl<L: Lister + ?Sized> Lister for &L {
    fn list(&self, dir: &Path) -> Result<Vec<RawEntry>, ListError> {
        (**self).list(dir)
    }
}

impl<L: Lister + ?Sized> Lister for Arc<L> {
    fn list(&self, dir: &Path) -> Result<Vec<RawEntry>, ListError> {
        (**self).list(dir)
    }
}

/// Lister backed by `std::fs::read_dir`.
///
/// Entry types come from `DirEntry::file_type`, which on most platforms is
/// filled in by the listing itself and costs no extra `stat`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl Lister for FsLister {
    fn list(&self, dir: &Path) -> Result<Vec<RawEntry>, ListError> {
        let mut children = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let entry_type = entry_type_of(entry.file_type(), &entry.path());
            children.push(RawEntry {
                name: entry.file_name(),
                entry_type,
            });
        }
        Ok(children)
    }
}

/// Type reported by the listing, or `Unknown` when the platform could not
/// tell without a separate lookup that failed.
fn entry_type_of(file_type: io::Result<FileType>, path: &Path) -> EntryType {
    match file_type {
        Ok(ft) => EntryType::from_file_type(ft),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "entry type unavailable");
            EntryType::Unknown
        }
    }
}

/// List one frontier node and turn its children into entry records.
pub fn list_children<L: Lister + ?Sized>(
    lister: &L,
    node: &FrontierNode,
) -> Result<Vec<DirectoryEntry>, ListError> {
    let raw = lister.list(&node.path)?;
    let depth = node.depth + 1;

    Ok(raw
        .into_iter()
        .map(|child| {
            let name = child.name.to_string_lossy().to_string();
            let relative_path = if node.relative.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", node.relative, name)
            };
            let path = node.path.join(&child.name);
            DirectoryEntry::new(name, relative_path, child.entry_type, depth, path)
        })
        .collect())
}
