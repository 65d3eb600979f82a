//! Recursive directory walking
//!
//! This module turns a root path into an ordered inventory of everything
//! below it. The pieces, leaves first:
//!
//! - `lister` - the directory-listing primitive (`Lister`) and `FsLister`
//! - `frontier` - entries not yet handed out, as a stack (depth-first) or queue
//!   (breadth-first)
//! - `engine` - `Traversal`, a lazy iterator driving the frontier
//! - `materialize` / `stream` - collect a walk eagerly or read it
//!   incrementally
//! - `exec` - `Walker`, which runs a request on the caller's thread or in
//!   the background

mod config;
mod engine;
mod exec;
mod frontier;
mod lister;
mod materialize;
mod stream;

// Re-export public types
pub use config::{
    Algorithm, DEFAULT_STREAM_CAPACITY, Delivery, Execution, OutputType, WalkRequest,
};
pub use engine::{CancelToken, Traversal, TraversalState};
pub use exec::{AsyncEntryStream, AsyncWalked, Walked, Walker, read_dir_recursive};
pub use frontier::{Frontier, FrontierNode};
pub use lister::{FsLister, Lister, RawEntry, list_children};
pub use materialize::{Listing, WalkItem, materialize};
pub use stream::{EntryStream, TextStream};
