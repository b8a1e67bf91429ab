use std::ops::Range;

use crate::text::{AttributedText, SpanId};

/// Regions of text that must be edited as a whole.
///
/// The session asks before every edit whether it is allowed, and which
/// regions it breaks. Broken regions are deleted along with their span once
/// the edit has been applied.
pub trait AtomicRegions {
    /// Whether replacing `range` with `inserted` must be refused.
    fn vetoes(&self, _text: &AttributedText, _range: &Range<usize>, _inserted: &str) -> bool {
        false
    }

    /// Spans whose region the replacement of `range` breaks.
    fn broken_by(&self, _text: &AttributedText, _range: &Range<usize>) -> Vec<SpanId> {
        Vec::new()
    }
}

/// Every edit allowed, nothing atomic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAtomicRegions;

impl AtomicRegions for NoAtomicRegions {}
