use std::ops::Range;

use log::debug;

use crate::editing::{AtomicRegions, Cmd, NoAtomicRegions, Patch};
use crate::markup::{ParseError, export_markup, import_markup};
use crate::style::{ChangeHooks, Color, FontSize, Link, StyleKind, StyleOptions, StyleSet};
use crate::text::{AttributedText, Selection, SpanError, SpanId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("edit of {range:?} refused by an atomic region")]
    Vetoed { range: Range<usize> },

    #[error("{0} is not an on/off style")]
    NotToggle(StyleKind),

    #[error(transparent)]
    Span(#[from] SpanError),
}

/// An attributed text being edited, with its selection and controllers.
pub struct Session<A: AtomicRegions = NoAtomicRegions> {
    text: AttributedText,
    selection: Selection,
    styles: StyleSet,
    atomic: A,
    version: u64,
    removal_in_progress: bool,
}

/// Where an edit wrote and where the caret ends up.
struct Trace {
    changed: Vec<Range<usize>>,
    caret: usize,
}

impl Session {
    pub fn new(text: AttributedText, options: &StyleOptions) -> Self {
        Self::with_atomic_regions(text, options, NoAtomicRegions)
    }

    pub fn from_markup(source: &str, options: &StyleOptions) -> Result<Self, ParseError> {
        let styles = StyleSet::new(options);
        let text = import_markup(source, &styles.markup_controllers())?;
        Ok(Self::from_parts(text, styles, NoAtomicRegions))
    }
}

impl<A: AtomicRegions> Session<A> {
    pub fn with_atomic_regions(text: AttributedText, options: &StyleOptions, atomic: A) -> Self {
        Self::from_parts(text, StyleSet::new(options), atomic)
    }

    fn from_parts(text: AttributedText, styles: StyleSet, atomic: A) -> Self {
        let selection = Selection::caret(text.len());
        Self {
            text,
            selection,
            styles,
            atomic,
            version: 0,
            removal_in_progress: false,
        }
    }

    pub fn text(&self) -> &AttributedText {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    /// Mutable access to the controllers, e.g. to register listeners.
    pub fn styles_mut(&mut self) -> &mut StyleSet {
        &mut self.styles
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Move the selection. Controllers refresh their state without
    /// committing anything staged.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.styles
            .check_after_change(&mut self.text, &self.selection, true);
    }

    pub fn to_markup(&self) -> String {
        export_markup(&self.text, &self.styles.markup_controllers())
    }

    /// Apply a command and return what changed.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let range = cmd.range();
        let inserted = cmd.text();
        self.text.check_range(&range)?;
        if self.atomic.vetoes(&self.text, &range, inserted) {
            debug!("edit of {range:?} vetoed");
            return Err(EditError::Vetoed { range });
        }

        let hook_selection = if self.selection.logical() == range {
            self.selection
        } else {
            Selection::range(range.start, range.end)
        };
        self.styles
            .check_before_change(&mut self.text, &hook_selection);

        let mut trace = Trace {
            changed: Vec::new(),
            caret: range.start + inserted.len(),
        };
        self.edit(range, inserted, &mut trace)?;

        self.selection = Selection::caret(trace.caret);
        self.styles
            .check_after_change(&mut self.text, &self.selection, false);
        self.version += 1;

        Ok(Patch {
            changed: trace.changed,
            new_selection: trace.caret..trace.caret,
            version: self.version,
        })
    }

    fn edit(&mut self, range: Range<usize>, inserted: &str, trace: &mut Trace) -> Result<(), EditError> {
        let broken = if self.removal_in_progress {
            Vec::new()
        } else {
            self.atomic.broken_by(&self.text, &range)
        };
        let written = self.text.replace(range.clone(), inserted)?;
        for earlier in &mut trace.changed {
            *earlier = shift_offset(earlier.start, &range, inserted.len())
                ..shift_offset(earlier.end, &range, inserted.len());
        }
        // A deletion point swallowed by this write is reported by it.
        trace.changed.retain(|earlier| {
            !(earlier.is_empty() && written.start <= earlier.start && earlier.end <= written.end)
        });
        trace.changed.push(written);
        if broken.is_empty() {
            return Ok(());
        }

        self.removal_in_progress = true;
        let result = self.remove_regions(&broken, trace);
        self.removal_in_progress = false;
        result
    }

    fn remove_regions(&mut self, ids: &[SpanId], trace: &mut Trace) -> Result<(), EditError> {
        for &id in ids {
            // An earlier removal may already have swallowed this region.
            let Some(entry) = self.text.remove_span(id) else {
                continue;
            };
            let region = entry.range;
            debug!("removing broken {} at {region:?}", entry.style);
            if region.is_empty() {
                continue;
            }
            trace.caret = shift_offset(trace.caret, &region, 0);
            self.edit(region, "", trace)?;
        }
        Ok(())
    }

    /// Turn an on/off style on or off over the selection.
    pub fn toggle(&mut self, kind: StyleKind) -> Result<(), EditError> {
        let controller = self
            .styles
            .toggle_mut(kind)
            .ok_or(EditError::NotToggle(kind))?;
        Ok(controller.toggle(&mut self.text, &self.selection)?)
    }

    /// Whether an on/off style is on at the selection.
    pub fn is_active(&self, kind: StyleKind) -> Result<bool, EditError> {
        let controller = self.styles.toggle(kind).ok_or(EditError::NotToggle(kind))?;
        Ok(controller.is_active(&self.text, &self.selection))
    }

    pub fn set_font_size(&mut self, size: FontSize) -> Result<(), EditError> {
        Ok(self.styles.font_size.apply(size, &mut self.text, &self.selection)?)
    }

    pub fn clear_font_size(&mut self) -> Result<(), EditError> {
        Ok(self.styles.font_size.clear(&mut self.text, &self.selection)?)
    }

    pub fn set_color(&mut self, color: Color) -> Result<(), EditError> {
        Ok(self.styles.color.apply(color, &mut self.text, &self.selection)?)
    }

    pub fn clear_color(&mut self) -> Result<(), EditError> {
        Ok(self.styles.color.clear(&mut self.text, &self.selection)?)
    }

    /// Link the selected text. `None` when nothing is selected or the
    /// target is rejected.
    pub fn add_link(&mut self, link: Link) -> Result<Option<SpanId>, EditError> {
        Ok(self.styles.link.apply(link, &mut self.text, &self.selection)?)
    }

    pub fn remove_links(&mut self) -> Vec<SpanId> {
        self.styles.link.clear(&mut self.text, &self.selection)
    }
}

/// Where `offset` lands once `range` is replaced by `inserted_len` bytes.
fn shift_offset(offset: usize, range: &Range<usize>, inserted_len: usize) -> usize {
    if offset <= range.start {
        offset
    } else if offset >= range.end {
        offset - range.len() + inserted_len
    } else {
        range.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{CurrentValue, Style};
    use crate::text::BoundaryMode;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn session(markup: &str) -> Session {
        Session::from_markup(markup, &StyleOptions::default()).unwrap()
    }

    fn insert(at: usize, text: &str) -> Cmd {
        Cmd::InsertText {
            at,
            text: text.to_string(),
        }
    }

    #[test]
    fn insert_moves_caret_and_bumps_version() {
        let mut session = session("Hello");
        session.set_selection(Selection::caret(5));
        let patch = session.apply(insert(5, " World")).unwrap();
        assert_eq!(session.text().text(), "Hello World");
        assert_eq!(patch.changed, vec![5..11]);
        assert_eq!(patch.new_selection, 11..11);
        assert_eq!(patch.version, 1);
        assert_eq!(session.version(), 1);
    }

    #[test]
    fn delete_and_replace() {
        let mut session = session("<b>Hello</b> World");
        session.apply(Cmd::DeleteRange { range: 0..2 }).unwrap();
        assert_snapshot!(session.to_markup(), @"<b>llo</b> World");

        let patch = session
            .apply(Cmd::ReplaceRange {
                range: 4..9,
                text: "there".to_string(),
            })
            .unwrap();
        assert_eq!(patch.new_selection, 9..9);
        assert_snapshot!(session.to_markup(), @"<b>llo</b> there");
    }

    #[test]
    fn out_of_bounds_edit_is_an_error() {
        let mut session = session("abc");
        assert_eq!(
            session.apply(Cmd::DeleteRange { range: 2..9 }),
            Err(EditError::Span(SpanError::OutOfBounds {
                start: 2,
                end: 9,
                len: 3
            }))
        );
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn bold_at_caret_applies_to_typed_text() {
        let mut session = session("ab");
        session.set_selection(Selection::caret(1));
        session.toggle(StyleKind::Bold).unwrap();
        assert!(session.is_active(StyleKind::Bold).unwrap());
        assert_eq!(session.text().spans_len(), 0);

        session.apply(insert(1, "X")).unwrap();
        session.apply(insert(2, "Y")).unwrap();
        assert_snapshot!(session.to_markup(), @"a<b>XY</b>b");
    }

    #[test]
    fn moving_the_caret_drops_staged_style() {
        let mut session = session("ab");
        session.set_selection(Selection::caret(1));
        session.toggle(StyleKind::Italic).unwrap();
        session.set_selection(Selection::caret(2));
        session.apply(insert(2, "c")).unwrap();
        assert_eq!(session.text().spans_len(), 0);
    }

    #[test]
    fn toggle_over_range_twice_restores_plain_text() {
        let mut session = session("plain text");
        session.set_selection(Selection::range(0, 5));
        session.toggle(StyleKind::Underline).unwrap();
        assert_snapshot!(session.to_markup(), @"<u>plain</u> text");
        session.toggle(StyleKind::Underline).unwrap();
        assert_snapshot!(session.to_markup(), @"plain text");
    }

    #[test]
    fn valued_styles_are_not_toggles() {
        let mut session = session("x");
        assert_eq!(
            session.toggle(StyleKind::Color),
            Err(EditError::NotToggle(StyleKind::Color))
        );
    }

    #[test]
    fn font_size_over_selection() {
        let mut session = session("small big");
        session.set_selection(Selection::range(6, 9));
        session.set_font_size(FontSize(24)).unwrap();
        assert_snapshot!(
            session.to_markup(),
            @r#"small <span style="font-size:24px;">big</span>"#
        );
        assert_eq!(
            session.styles().font_size.value(),
            &CurrentValue::Value(FontSize(24))
        );

        session.set_selection(Selection::range(0, 9));
        assert!(session.styles().font_size.value().is_mixed());
        session.clear_font_size().unwrap();
        assert_eq!(session.text().spans_len(), 0);
    }

    #[test]
    fn color_at_caret_applies_to_typed_text() {
        let mut session = session("ab");
        session.set_selection(Selection::caret(2));
        session.set_color(Color(0x00ff00)).unwrap();
        session.apply(insert(2, "c")).unwrap();
        assert_snapshot!(
            session.to_markup(),
            @r#"ab<span style="color:#00ff00;">c</span>"#
        );
    }

    #[test]
    fn links_are_added_and_removed_whole() {
        let mut session = session("see docs here");
        session.set_selection(Selection::range(4, 8));
        let id = session.add_link(Link::new("https://docs.example")).unwrap();
        assert!(id.is_some());
        assert_eq!(
            session.text().span(id.unwrap()).map(|e| e.mode),
            Some(BoundaryMode::ExclusiveExclusive)
        );

        session.set_selection(Selection::caret(6));
        assert_eq!(session.remove_links(), vec![id.unwrap()]);
        assert_eq!(session.text().spans_len(), 0);
    }

    #[test]
    fn set_selection_notifies_listeners() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut session = session("<b>on</b> off");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session
            .styles_mut()
            .bold
            .on_change(move |active| sink.borrow_mut().push(active));

        session.set_selection(Selection::caret(1));
        session.set_selection(Selection::caret(2));
        session.set_selection(Selection::caret(4));
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn span_survives_typing_inside_it() {
        let mut session = session("<i>ac</i>");
        session.set_selection(Selection::caret(1));
        session.apply(insert(1, "b")).unwrap();
        assert_eq!(
            session.text().spans(0..3, StyleKind::Italic)[0].style,
            Style::Italic
        );
        assert_snapshot!(session.to_markup(), @"<i>abc</i>");
    }
}
