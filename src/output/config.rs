//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Bytes written after every path
    pub delimiter: Vec<u8>,
    /// Prefix each line with the entry type (entry records only)
    pub show_types: bool,
    /// Print a count of directories, files and other entries at the end
    pub summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            delimiter: b"\n".to_vec(),
            show_types: false,
            summary: false,
        }
    }
}
