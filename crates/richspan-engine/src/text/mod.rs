//! # Span Interval Model
//!
//! [`AttributedText`] is the attributed-text buffer every other module works
//! against: a single `xi_rope::Rope` holding the characters plus an
//! insertion-ordered list of [`SpanEntry`]s.
//!
//! ## Edits
//!
//! Text edits compile to an xi-rope `Delta`. Span bounds are carried through
//! the same delta with a `Transformer`; each edge picks its side of an
//! insertion from the span's [`BoundaryMode`]:
//!
//! - start edge: `after = !start_inclusive` (an inclusive start stays put and absorbs)
//! - end edge: `after = end_inclusive` (an inclusive end moves past the insertion)
//!
//! Spans that a deletion collapses to nothing are dropped. Spans that were
//! already empty (a pending span committed just before an insertion) survive
//! so the insertion can grow them.
//!
//! ## Queries
//!
//! [`AttributedText::spans`] returns the spans of one kind intersecting a
//! range, in insertion order. Offsets are UTF-8 byte offsets.

pub mod boundary;
pub mod invariants;
pub mod selection;
pub mod span;

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use xi_rope::delta::{Builder, Transformer};
use xi_rope::{Delta, Rope, RopeInfo};

use crate::style::{Style, StyleKind};

pub use boundary::BoundaryMode;
pub use invariants::InvariantViolation;
pub use selection::Selection;
pub use span::{SpanEntry, SpanId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpanError {
    #[error("invalid range {start}..{end}: start > end")]
    InvalidRange { start: usize, end: usize },
    #[error("range {start}..{end} out of bounds for len {len}")]
    OutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("index {index} is not on a UTF-8 character boundary")]
    NotOnCharBoundary { index: usize },
    #[error("unknown span {0:?}")]
    UnknownSpan(SpanId),
}

/// A text buffer with typed style spans applied to ranges within it.
#[derive(Clone)]
pub struct AttributedText {
    buffer: Rope,
    spans: Vec<SpanEntry>,
    next_id: u64,
}

impl AttributedText {
    /// Create a buffer holding `text` with no spans.
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            spans: Vec::new(),
            next_id: 0,
        }
    }

    /// Returns the length of the text, in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Slice the text; the range is clamped to the buffer.
    pub fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.buffer.slice_to_cow(start..end)
    }

    /// The character starting at byte `offset`, if any.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.len() || !self.is_char_boundary(offset) {
            return None;
        }
        let next = self.buffer.next_codepoint_offset(offset)?;
        self.buffer.slice_to_cow(offset..next).chars().next()
    }

    pub fn is_char_boundary(&self, offset: usize) -> bool {
        if offset == 0 || offset == self.len() {
            return true;
        }
        offset < self.len() && self.buffer.is_codepoint_boundary(offset)
    }

    /// Validate a range against the current text.
    pub fn check_range(&self, range: &Range<usize>) -> Result<(), SpanError> {
        let len = self.len();
        if range.start > range.end {
            return Err(SpanError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > len {
            return Err(SpanError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        for index in [range.start, range.end] {
            if !self.is_char_boundary(index) {
                return Err(SpanError::NotOnCharBoundary { index });
            }
        }
        Ok(())
    }

    /// Replace `range` with `text`, carrying every span through the edit.
    ///
    /// Returns the range the inserted text occupies afterwards.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<Range<usize>, SpanError> {
        self.check_range(&range)?;
        let mut builder = Builder::new(self.buffer.len());
        if text.is_empty() {
            builder.delete(range.clone());
        } else {
            builder.replace(range.clone(), Rope::from(text));
        }
        let delta = builder.build();
        self.buffer = delta.apply(&self.buffer);
        self.transform_spans(&delta);
        Ok(range.start..range.start + text.len())
    }

    pub fn insert(&mut self, at: usize, text: &str) -> Result<Range<usize>, SpanError> {
        self.replace(at..at, text)
    }

    pub fn delete(&mut self, range: Range<usize>) -> Result<(), SpanError> {
        self.replace(range, "").map(|_| ())
    }

    fn transform_spans(&mut self, delta: &Delta<RopeInfo>) {
        let mut transformer = Transformer::new(delta);
        let len = self.buffer.len();

        self.spans.retain_mut(|entry| {
            let was_empty = entry.range.is_empty();
            let start = transformer.transform(entry.range.start, !entry.mode.start_inclusive());
            let end = transformer.transform(entry.range.end, entry.mode.end_inclusive());
            let start = start.min(len);
            entry.range = start..end.min(len).max(start);
            was_empty || !entry.range.is_empty()
        });
    }

    /// Spans of `kind` intersecting `range`, in insertion order.
    ///
    /// See [`SpanEntry::intersects`] for how edges are treated.
    pub fn spans(&self, range: Range<usize>, kind: StyleKind) -> Vec<SpanEntry> {
        self.spans
            .iter()
            .filter(|entry| entry.kind() == kind && entry.intersects(&range))
            .cloned()
            .collect()
    }

    /// Every span of `kind`, in insertion order.
    pub fn spans_of_kind(&self, kind: StyleKind) -> impl Iterator<Item = &SpanEntry> {
        self.spans.iter().filter(move |entry| entry.kind() == kind)
    }

    /// Iterate over all spans in the order they were inserted.
    pub fn iter_spans(&self) -> impl ExactSizeIterator<Item = &SpanEntry> {
        self.spans.iter()
    }

    pub fn spans_len(&self) -> usize {
        self.spans.len()
    }

    /// Apply `style` to `range` as a new span.
    pub fn set_span(
        &mut self,
        style: Style,
        range: Range<usize>,
        mode: BoundaryMode,
    ) -> Result<SpanId, SpanError> {
        self.check_range(&range)?;
        Ok(self.insert_span(style, range, mode))
    }

    /// Insert a span whose bounds the caller derived from existing spans or the current length.
    pub(crate) fn insert_span(&mut self, style: Style, range: Range<usize>, mode: BoundaryMode) -> SpanId {
        debug_assert!(
            range.start <= range.end && range.end <= self.len(),
            "span {range:?} out of bounds for len {}",
            self.len()
        );
        let id = SpanId(self.next_id);
        self.next_id += 1;
        self.spans.push(SpanEntry {
            id,
            style,
            range,
            mode,
        });
        id
    }

    pub fn remove_span(&mut self, id: SpanId) -> Option<SpanEntry> {
        let index = self.spans.iter().position(|entry| entry.id == id)?;
        Some(self.spans.remove(index))
    }

    pub fn span(&self, id: SpanId) -> Option<&SpanEntry> {
        self.spans.iter().find(|entry| entry.id == id)
    }

    pub fn span_range(&self, id: SpanId) -> Result<Range<usize>, SpanError> {
        self.span(id)
            .map(|entry| entry.range.clone())
            .ok_or(SpanError::UnknownSpan(id))
    }

    pub fn span_mode(&self, id: SpanId) -> Result<BoundaryMode, SpanError> {
        self.span(id)
            .map(|entry| entry.mode)
            .ok_or(SpanError::UnknownSpan(id))
    }
}

impl Default for AttributedText {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<&str> for AttributedText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Debug for AttributedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributedText")
            .field("text", &self.text())
            .field("spans", &self.spans)
            .finish()
    }
}
