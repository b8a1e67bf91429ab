use std::ops::Range;

use crate::style::{Style, StyleKind};
use crate::text::BoundaryMode;

/// Identity of a span inside one [`AttributedText`](crate::text::AttributedText).
///
/// Ids are never reused, so two spans with the same style and bounds are
/// still distinguishable (links rely on this).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct SpanId(pub u64);

/// A typed, value-bearing interval over the text.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanEntry {
    pub id: SpanId,
    pub style: Style,
    pub range: Range<usize>, // byte range in the rope
    pub mode: BoundaryMode,
}

impl SpanEntry {
    pub fn kind(&self) -> StyleKind {
        self.style.kind()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Range-query intersection.
    ///
    /// Spans overlapping the query are always returned. When both the span
    /// and the query are non-empty, a span that merely touches the query at
    /// one end is not; a caret query returns spans starting or ending at the
    /// caret.
    pub fn intersects(&self, query: &Range<usize>) -> bool {
        let Range { start, end } = self.range;
        if start > query.end || end < query.start {
            return false;
        }
        if start != end && query.start != query.end && (start == query.end || end == query.start)
        {
            return false;
        }
        true
    }

    /// Whether the span overlaps or shares an edge with `other`.
    pub fn touches(&self, other: &Range<usize>) -> bool {
        self.range.start <= other.end && self.range.end >= other.start
    }
}
