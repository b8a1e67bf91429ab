use std::ops::Range;

/// Selection handed to the style controllers.
///
/// `start`/`end` is the logical range mutations are applied to;
/// `real_start`/`real_end` is the caret or selection the host currently
/// shows, used for read-only value queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub real_start: usize,
    pub real_end: usize,
}

impl Selection {
    /// Collapsed caret at `at`.
    pub fn caret(at: usize) -> Self {
        Self::range(at, at)
    }

    /// Logical and real selection over the same range.
    pub fn range(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            real_start: start,
            real_end: end,
        }
    }

    pub fn with_real(start: usize, end: usize, real_start: usize, real_end: usize) -> Self {
        Self {
            start,
            end,
            real_start,
            real_end,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn is_real_caret(&self) -> bool {
        self.real_start == self.real_end
    }

    pub fn logical(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn real(&self) -> Range<usize> {
        self.real_start..self.real_end
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::range(range.start, range.end)
    }
}
