use std::ops::Range;

use crate::text::BoundaryMode;

/// A style choice waiting for text to land on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Staged<S> {
    pub style: S,
    pub range: Range<usize>,
    pub mode: BoundaryMode,
}

/// One-slot lookahead for a style applied at an empty caret.
///
/// The staged range is only written to the buffer by the change hooks once
/// text is typed, so the buffer never holds an empty styled range that the
/// user did not type into.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSpan<S> {
    staged: Option<Staged<S>>,
}

impl<S> PendingSpan<S> {
    pub fn new() -> Self {
        Self { staged: None }
    }

    /// Stage a span, replacing whatever was staged before.
    pub fn stage(&mut self, style: S, range: Range<usize>, mode: BoundaryMode) {
        self.staged = Some(Staged { style, range, mode });
    }

    pub fn staged(&self) -> Option<&Staged<S>> {
        self.staged.as_ref()
    }

    pub fn take(&mut self) -> Option<Staged<S>> {
        self.staged.take()
    }

    pub fn clear(&mut self) {
        self.staged = None;
    }

    /// Whether something is staged starting exactly at `at`.
    pub fn is_staged_at(&self, at: usize) -> bool {
        self.staged.as_ref().is_some_and(|s| s.range.start == at)
    }
}

impl<S> Default for PendingSpan<S> {
    fn default() -> Self {
        Self::new()
    }
}
