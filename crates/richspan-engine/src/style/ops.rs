//! Span operations shared by every controller.

use std::ops::Range;

use log::debug;

use crate::style::{PendingSpan, Style, StyleKind};
use crate::text::{AttributedText, BoundaryMode, Selection, SpanId, invariants};

/// Remove `kind` from `range`, keeping whatever lies outside it.
///
/// Each intersecting span is removed, then its residuals are re-created:
/// a span contained in the range leaves nothing, one overlapping the left
/// edge keeps `[span_start, range_start)`, one overlapping the right edge
/// keeps `[range_end, span_end)`, and one straddling the range keeps both.
/// Residuals stop growing at the cut.
pub fn clear_range(text: &mut AttributedText, kind: StyleKind, range: &Range<usize>) {
    if range.is_empty() {
        return;
    }
    for entry in text.spans(range.clone(), kind) {
        text.remove_span(entry.id);
        if entry.range.start < range.start {
            text.insert_span(
                entry.style.clone(),
                entry.range.start..range.start,
                entry.mode.left_of_cut(),
            );
        }
        if entry.range.end > range.end {
            text.insert_span(entry.style, range.end..entry.range.end, entry.mode.right_of_cut());
        }
    }
}

/// Insert `style` over `range`, absorbing every equal span that overlaps or
/// touches it so a single span remains.
pub fn merge_range(
    text: &mut AttributedText,
    style: Style,
    range: Range<usize>,
    mode: BoundaryMode,
) -> SpanId {
    let kind = style.kind();
    let mut start = range.start;
    let mut end = range.end;
    let absorbed: Vec<_> = text
        .spans_of_kind(kind)
        .filter(|entry| entry.style == style && entry.touches(&range))
        .map(|entry| (entry.id, entry.range.clone()))
        .collect();
    for (id, bounds) in absorbed {
        start = start.min(bounds.start);
        end = end.max(bounds.end);
        text.remove_span(id);
    }
    text.insert_span(style, start..end, mode)
}

/// Turn `kind` off from the caret on: the span covering `at` is removed and,
/// unless `at` is 0, its part left of the caret comes back with an exclusive
/// end so text typed at `at` no longer inherits it.
pub fn clear_at_caret(text: &mut AttributedText, kind: StyleKind, at: usize) {
    for entry in text.spans(at..at, kind) {
        if entry.is_empty() || !entry.mode.covers_insertion(&entry.range, at) {
            continue;
        }
        text.remove_span(entry.id);
        if at != 0 && entry.range.start < at {
            text.insert_span(entry.style, entry.range.start..at, BoundaryMode::InclusiveExclusive);
        }
    }
}

/// Before an edit at a caret holding a staged span: write the staged span to
/// the buffer and cut the live spans of the same kind around the caret.
///
/// The part of a live span right of the caret is kept so it never grows over
/// the insertion. The part left of it is staged again (committed by the
/// after-change hook) when the host's real caret agrees with the edit, and
/// inserted straight away otherwise.
pub(crate) fn commit_pending_before_edit(
    text: &mut AttributedText,
    kind: StyleKind,
    pending: &mut PendingSpan<Style>,
    selection: &Selection,
) {
    let caret = selection.start;
    if !selection.is_caret() || !pending.is_staged_at(caret) {
        return;
    }
    let touching = text.spans(caret..caret, kind);
    let Some(staged) = pending.take() else {
        return;
    };
    let end = staged.range.end.min(text.len());
    debug!("committing pending {} at {}..{}", staged.style, caret, end);
    text.insert_span(staged.style, caret.min(end)..end, staged.mode);

    for entry in touching {
        text.remove_span(entry.id);
        if entry.range.end > caret {
            let start = entry.range.start.max(caret);
            text.insert_span(entry.style.clone(), start..entry.range.end, entry.mode.right_of_cut());
        }
        if entry.range.start < caret {
            let left = entry.range.start..caret;
            let mode = entry.mode.left_of_cut();
            if pending.staged().is_none() && caret != 0 && selection.end == selection.real_end {
                pending.stage(entry.style, left, mode);
            } else {
                text.insert_span(entry.style, left, mode);
            }
        }
    }
    debug_assert_eq!(invariants::check(text), Ok(()));
}

/// After an edit: commit what is still staged unless the check is passive.
pub(crate) fn commit_pending_after_edit(
    text: &mut AttributedText,
    pending: &mut PendingSpan<Style>,
    passive: bool,
) {
    let Some(staged) = pending.take() else {
        return;
    };
    if passive {
        return;
    }
    let end = staged.range.end.min(text.len());
    let start = staged.range.start.min(end);
    if start < end {
        text.insert_span(staged.style, start..end, staged.mode);
    }
    debug_assert_eq!(invariants::check(text), Ok(()));
}
