//! Burrow - recursive directory listing, depth-first or breadth-first,
//! collected up front or streamed, on the caller's thread or in the background

pub mod entry;
pub mod error;
pub mod output;
pub mod walk;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use entry::{DirectoryEntry, EntryType};
pub use error::{ListError, WalkError};
pub use output::{EntrySink, JsonFormatter, OutputConfig, PlainFormatter, Summary};
pub use walk::{
    Algorithm, AsyncEntryStream, AsyncWalked, CancelToken, Delivery, EntryStream, Execution,
    FsLister, Listing, Lister, OutputType, Traversal, WalkItem, WalkRequest, Walked, Walker,
    read_dir_recursive,
};
