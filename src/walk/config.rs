//! Request types for walks

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

/// Default number of items buffered between a background walk and its reader.
pub const DEFAULT_STREAM_CAPACITY: usize = 64;

/// Order in which the tree is visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Expand each subdirectory fully before its next sibling directory
    #[default]
    #[value(alias = "dfs")]
    DepthFirst,
    /// Report every entry at depth k before any entry at depth k+1
    #[value(alias = "bfs")]
    BreadthFirst,
}

/// Shape of each reported item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputType {
    /// Root-relative path strings
    #[default]
    Paths,
    /// Entry records carrying name, relative path and type
    Entries,
}

/// Whether results are collected up front or handed out incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Delivery {
    #[default]
    Materialized,
    Streamed,
}

/// Which thread runs the listing calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Execution {
    /// The caller's thread
    #[default]
    Synchronous,
    /// A background execution context
    Asynchronous,
}

/// Everything a walk needs to know, fixed for the lifetime of one walk.
#[derive(Debug, Clone)]
pub struct WalkRequest {
    pub root: PathBuf,
    pub algorithm: Algorithm,
    pub output_type: OutputType,
    pub delivery: Delivery,
    pub execution: Execution,
    /// Bound on items buffered between a background producer and the
    /// consumer. Values below 1 are treated as 1.
    pub stream_capacity: usize,
}

impl WalkRequest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            algorithm: Algorithm::default(),
            output_type: OutputType::default(),
            delivery: Delivery::default(),
            execution: Execution::default(),
            stream_capacity: DEFAULT_STREAM_CAPACITY,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.stream_capacity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = WalkRequest::new("/tmp");
        assert_eq!(req.algorithm, Algorithm::DepthFirst);
        assert_eq!(req.output_type, OutputType::Paths);
        assert_eq!(req.delivery, Delivery::Materialized);
        assert_eq!(req.execution, Execution::Synchronous);
        assert_eq!(req.stream_capacity, DEFAULT_STREAM_CAPACITY);
    }

    #[test]
    fn test_capacity_clamped() {
        let req = WalkRequest {
            stream_capacity: 0,
            ..WalkRequest::new(".")
        };
        assert_eq!(req.capacity(), 1);
    }

    #[test]
    fn test_algorithm_value_names() {
        assert_eq!(
            Algorithm::from_str("depth-first", false).unwrap(),
            Algorithm::DepthFirst
        );
        assert_eq!(
            Algorithm::from_str("bfs", false).unwrap(),
            Algorithm::BreadthFirst
        );
        assert!(Algorithm::from_str("random", false).is_err());
    }
}
