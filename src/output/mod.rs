//! Walk result formatting
//!
//! Formatters implement `EntrySink` so the CLI can feed them one item at a
//! time, whether the walk was collected first or streamed:
//! - `plain` - delimiter-separated paths, optionally type-tagged and colored
//! - `json` - a JSON array, or JSON lines for streamed walks

mod config;
mod json;
mod plain;

use std::io;

use crate::entry::EntryType;
use crate::walk::WalkItem;

pub use config::OutputConfig;
pub use json::JsonFormatter;
pub use plain::PlainFormatter;

/// Running totals over the items written so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub dirs: usize,
    pub files: usize,
    /// Symlinks, sockets, devices, FIFOs and unknown entries
    pub other: usize,
    /// Items with no type information (path output)
    pub untyped: usize,
}

impl Summary {
    pub fn record(&mut self, item: &WalkItem) {
        match item.as_entry().map(|e| e.entry_type()) {
            Some(EntryType::Directory) => self.dirs += 1,
            Some(EntryType::File) => self.files += 1,
            Some(_) => self.other += 1,
            None => self.untyped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.dirs + self.files + self.other + self.untyped
    }
}

/// Receives walk items for display.
pub trait EntrySink {
    fn write_item(&mut self, item: &WalkItem) -> io::Result<()>;

    fn finish(&mut self, summary: &Summary) -> io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_tree;
    use crate::walk::{OutputType, Walker, WalkRequest};

    #[test]
    fn test_summary_counts_types() {
        let walker = Walker::new(WalkRequest::new("/root")).with_lister(sample_tree());
        let mut summary = Summary::default();
        for entry in walker.traverse() {
            summary.record(&WalkItem::shape(entry.unwrap(), OutputType::Entries));
        }
        assert_eq!(summary.dirs, 3);
        assert_eq!(summary.files, 8);
        assert_eq!(summary.other, 0);
        assert_eq!(summary.total(), 11);
    }

    #[test]
    fn test_summary_untyped_paths() {
        let mut summary = Summary::default();
        summary.record(&WalkItem::Path("x".to_string()));
        assert_eq!(summary.untyped, 1);
        assert_eq!(summary.total(), 1);
    }
}
