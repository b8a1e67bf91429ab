use std::ops::Range;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Ranges written by the edit, in the order they were written and in
    /// offsets of the text after the edit. Deletions show up as empty ranges
    /// at the point of deletion.
    pub changed: Vec<Range<usize>>,
    pub new_selection: Range<usize>,
    pub version: u64,
}
