use log::trace;

use crate::markup::{Attributes, MarkupController, StyleMap};
use crate::style::ops::{self, commit_pending_after_edit, commit_pending_before_edit};
use crate::style::{ChangeHooks, PendingSpan, Style, StyleKind};
use crate::text::{AttributedText, BoundaryMode, Selection, SpanError, invariants};

/// Controller for a presence-only style such as bold.
pub struct ToggleController {
    style: Style,
    tag_name: &'static str,
    aliases: &'static [&'static str],
    pending: PendingSpan<Style>,
    active: Option<bool>,
    listeners: Vec<Box<dyn FnMut(bool)>>,
}

impl ToggleController {
    fn new(style: Style, tag_name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            style,
            tag_name,
            aliases,
            pending: PendingSpan::new(),
            active: None,
            listeners: Vec::new(),
        }
    }

    pub fn bold() -> Self {
        Self::new(Style::Bold, "b", &["strong"])
    }

    pub fn italic() -> Self {
        Self::new(Style::Italic, "i", &["em"])
    }

    pub fn underline() -> Self {
        Self::new(Style::Underline, "u", &[])
    }

    pub fn strikethrough() -> Self {
        Self::new(Style::Strikethrough, "s", &["strike", "del"])
    }

    pub fn kind(&self) -> StyleKind {
        self.style.kind()
    }

    pub fn pending(&self) -> &PendingSpan<Style> {
        &self.pending
    }

    /// Register a listener called whenever the active state changes.
    pub fn on_change(&mut self, listener: impl FnMut(bool) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply the style over the logical selection.
    ///
    /// At a caret the style is staged for the next typed character. Over a
    /// range, every span of this kind overlapping or touching it is merged
    /// with the range into a single span.
    pub fn apply(&mut self, text: &mut AttributedText, selection: &Selection) -> Result<(), SpanError> {
        text.check_range(&selection.logical())?;
        if selection.is_caret() {
            self.pending.stage(
                self.style.clone(),
                selection.start..selection.start,
                BoundaryMode::InclusiveInclusive,
            );
        } else {
            ops::merge_range(
                text,
                self.style.clone(),
                selection.logical(),
                BoundaryMode::InclusiveInclusive,
            );
            debug_assert_eq!(invariants::check(text), Ok(()));
        }
        self.refresh(text, selection);
        Ok(())
    }

    /// Remove the style from the logical selection.
    ///
    /// At a caret the covering span is removed and only its part left of the
    /// caret is put back, so typing there stops inheriting it; anything staged
    /// at the caret is dropped.
    pub fn clear(&mut self, text: &mut AttributedText, selection: &Selection) -> Result<(), SpanError> {
        text.check_range(&selection.logical())?;
        if selection.is_caret() {
            if self.pending.is_staged_at(selection.start) {
                self.pending.clear();
            }
            ops::clear_at_caret(text, self.kind(), selection.start);
        } else {
            ops::clear_range(text, self.kind(), &selection.logical());
        }
        debug_assert_eq!(invariants::check(text), Ok(()));
        self.refresh(text, selection);
        Ok(())
    }

    /// Clear when active, apply otherwise.
    pub fn toggle(&mut self, text: &mut AttributedText, selection: &Selection) -> Result<(), SpanError> {
        if self.is_active(text, selection) {
            self.clear(text, selection)
        } else {
            self.apply(text, selection)
        }
    }

    /// Whether the style is on at the real selection.
    ///
    /// At a caret this means text typed there would carry the style; over a
    /// range the spans must cover all of it.
    pub fn is_active(&self, text: &AttributedText, selection: &Selection) -> bool {
        let real = selection.real();
        if selection.is_real_caret() {
            if self.pending.is_staged_at(real.start) {
                return true;
            }
            return text
                .spans(real.clone(), self.kind())
                .iter()
                .any(|entry| entry.mode.covers_insertion(&entry.range, real.start));
        }

        let mut spans = text.spans(real.clone(), self.kind());
        spans.sort_by_key(|entry| entry.range.start);
        let mut covered = real.start;
        for entry in &spans {
            if entry.range.start > covered {
                break;
            }
            covered = covered.max(entry.range.end);
        }
        covered >= real.end
    }

    fn refresh(&mut self, text: &AttributedText, selection: &Selection) {
        let active = self.is_active(text, selection);
        if self.active != Some(active) {
            trace!("{} active: {}", self.kind(), active);
            self.active = Some(active);
            for listener in &mut self.listeners {
                listener(active);
            }
        }
    }
}

impl ChangeHooks for ToggleController {
    fn check_before_change(&mut self, text: &mut AttributedText, selection: &Selection) {
        commit_pending_before_edit(text, self.kind(), &mut self.pending, selection);
    }

    fn check_after_change(&mut self, text: &mut AttributedText, selection: &Selection, passive: bool) {
        commit_pending_after_edit(text, &mut self.pending, passive);
        self.refresh(text, selection);
    }
}

impl MarkupController for ToggleController {
    fn kind(&self) -> StyleKind {
        self.style.kind()
    }

    fn style_from_tag(&self, tag: &str, _style_map: &StyleMap, _attributes: &Attributes) -> Option<Style> {
        self.owns_close_tag(tag).then(|| self.style.clone())
    }

    fn owns_close_tag(&self, tag: &str) -> bool {
        tag == self.tag_name || self.aliases.contains(&tag)
    }

    fn open_tag(&self, _style: &Style) -> String {
        format!("<{}>", self.tag_name)
    }

    fn close_tag(&self) -> String {
        format!("</{}>", self.tag_name)
    }
}
