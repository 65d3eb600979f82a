//! Eager collection of a walk into one ordered listing.

use serde::Serialize;

use crate::entry::DirectoryEntry;
use crate::error::WalkError;

use super::config::OutputType;

/// One reported item, shaped by the requested output type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WalkItem {
    Path(String),
    Entry(DirectoryEntry),
}

impl WalkItem {
    pub fn shape(entry: DirectoryEntry, output_type: OutputType) -> Self {
        match output_type {
            OutputType::Paths => WalkItem::Path(entry.relative_path().to_string()),
            OutputType::Entries => WalkItem::Entry(entry),
        }
    }

    pub fn relative_path(&self) -> &str {
        match self {
            WalkItem::Path(p) => p,
            WalkItem::Entry(e) => e.relative_path(),
        }
    }

    pub fn as_entry(&self) -> Option<&DirectoryEntry> {
        match self {
            WalkItem::Path(_) => None,
            WalkItem::Entry(e) => Some(e),
        }
    }
}

/// A fully collected walk, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    Paths(Vec<String>),
    Entries(Vec<DirectoryEntry>),
}

impl Listing {
    pub fn len(&self) -> usize {
        match self {
            Listing::Paths(p) => p.len(),
            Listing::Entries(e) => e.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Relative paths in order, whichever shape was collected.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Listing::Paths(p) => p.iter().map(String::as_str).collect(),
            Listing::Entries(e) => e.iter().map(DirectoryEntry::relative_path).collect(),
        }
    }

    pub fn entries(&self) -> Option<&[DirectoryEntry]> {
        match self {
            Listing::Paths(_) => None,
            Listing::Entries(e) => Some(e),
        }
    }

    pub fn into_items(self) -> Vec<WalkItem> {
        match self {
            Listing::Paths(p) => p.into_iter().map(WalkItem::Path).collect(),
            Listing::Entries(e) => e.into_iter().map(WalkItem::Entry).collect(),
        }
    }
}

/// Drain a walk completely. Any error discards everything collected so far.
pub fn materialize<I>(walk: I, output_type: OutputType) -> Result<Listing, WalkError>
where
    I: Iterator<Item = Result<DirectoryEntry, WalkError>>,
{
    match output_type {
        OutputType::Paths => walk
            .map(|r| r.map(|e| e.relative_path().to_string()))
            .collect::<Result<Vec<_>, _>>()
            .map(Listing::Paths),
        OutputType::Entries => walk
            .collect::<Result<Vec<_>, _>>()
            .map(Listing::Entries),
    }
}
