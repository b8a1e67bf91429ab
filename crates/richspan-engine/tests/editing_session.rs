use std::ops::Range;

use pretty_assertions::assert_eq;
use richspan_engine::{
    AtomicRegions, AttributedText, Cmd, CurrentValue, EditError, FontSize, Link, Selection,
    Session, SpanEntry, SpanId, Style, StyleKind, StyleOptions,
};

/// Links marked inseparable may not be typed into, and any edit cutting
/// into one deletes the whole link.
struct InseparableLinks;

fn inseparable(text: &AttributedText) -> impl Iterator<Item = &SpanEntry> {
    text.spans_of_kind(StyleKind::Link)
        .filter(|entry| matches!(&entry.style, Style::Link(link) if link.inseparable))
}

impl AtomicRegions for InseparableLinks {
    fn vetoes(&self, text: &AttributedText, range: &Range<usize>, inserted: &str) -> bool {
        range.is_empty()
            && !inserted.is_empty()
            && inseparable(text).any(|e| e.range.start < range.start && range.start < e.range.end)
    }

    fn broken_by(&self, text: &AttributedText, range: &Range<usize>) -> Vec<SpanId> {
        if range.is_empty() {
            return Vec::new();
        }
        inseparable(text)
            .filter(|e| e.range.start < range.end && range.start < e.range.end)
            .map(|e| e.id)
            .collect()
    }
}

fn linked(content: &str, links: &[Range<usize>]) -> Session<InseparableLinks> {
    let mut session = Session::with_atomic_regions(
        AttributedText::new(content),
        &StyleOptions::default(),
        InseparableLinks,
    );
    for range in links {
        session.set_selection(range.clone().into());
        session
            .add_link(Link::new("https://docs.example"))
            .unwrap()
            .unwrap();
    }
    session
}

fn insert(at: usize, text: &str) -> Cmd {
    Cmd::InsertText {
        at,
        text: text.to_string(),
    }
}

#[test]
fn typing_inside_an_inseparable_link_is_refused() {
    let mut session = linked("see docs here", &[4..8]);
    session.set_selection(Selection::caret(6));
    assert_eq!(
        session.apply(insert(6, "x")),
        Err(EditError::Vetoed { range: 6..6 })
    );
    assert_eq!(session.text().text(), "see docs here");
    assert_eq!(session.version(), 0);
}

#[test]
fn typing_at_the_link_edge_does_not_extend_it() {
    let mut session = linked("see docs here", &[4..8]);
    session.set_selection(Selection::caret(8));
    session.apply(insert(8, "s")).unwrap();
    assert_eq!(session.text().text(), "see docss here");
    let links: Vec<_> = session
        .text()
        .spans_of_kind(StyleKind::Link)
        .map(|e| e.range.clone())
        .collect();
    assert_eq!(links, vec![4..8]);
}

#[test]
fn deleting_inside_a_link_removes_all_of_it() {
    let mut session = linked("see docs here", &[4..8]);
    let patch = session.apply(Cmd::DeleteRange { range: 5..6 }).unwrap();
    assert_eq!(session.text().text(), "see  here");
    assert_eq!(session.text().spans_len(), 0);
    assert_eq!(patch.changed, vec![4..4]);
    assert_eq!(patch.new_selection, 4..4);
}

#[test]
fn deleting_across_two_links_removes_both() {
    let mut session = linked("one two three end", &[0..3, 8..13]);
    let patch = session.apply(Cmd::DeleteRange { range: 2..10 }).unwrap();
    assert_eq!(session.text().text(), " end");
    assert_eq!(session.text().spans_len(), 0);
    assert_eq!(patch.changed, vec![0..0]);
    assert_eq!(patch.new_selection, 0..0);
}

#[test]
fn deleting_a_whole_link_leaves_nothing_to_remove() {
    let mut session = linked("see docs here", &[4..8]);
    let patch = session.apply(Cmd::DeleteRange { range: 3..9 }).unwrap();
    assert_eq!(session.text().text(), "seehere");
    assert_eq!(patch.changed, vec![3..3]);
}

#[test]
fn replacing_into_a_link_removes_the_text_with_it() {
    let mut session = linked("docs ab", &[0..4]);
    let patch = session
        .apply(Cmd::ReplaceRange {
            range: 3..6,
            text: "XYZ".to_string(),
        })
        .unwrap();
    // The link grew over "XYZ" before it was removed.
    assert_eq!(session.text().text(), "b");
    assert_eq!(patch.changed, vec![0..0]);
    assert_eq!(patch.new_selection, 0..0);
}

#[test]
fn separable_links_are_edited_like_text() {
    let options = StyleOptions {
        link_inseparable: false,
        ..StyleOptions::default()
    };
    let mut session =
        Session::with_atomic_regions(AttributedText::new("see docs"), &options, InseparableLinks);
    session.set_selection(Selection::range(4, 8));
    session.add_link(Link::new("https://docs.example")).unwrap();

    session.set_selection(Selection::caret(6));
    session.apply(insert(6, "x")).unwrap();
    assert_eq!(session.text().text(), "see doxcs");
    let links: Vec<_> = session
        .text()
        .spans_of_kind(StyleKind::Link)
        .map(|e| e.range.clone())
        .collect();
    assert_eq!(links, vec![4..9]);
}

#[test]
fn toggled_bold_extends_while_typing_and_stops_when_cleared() {
    let mut session = Session::new(AttributedText::new("ab"), &StyleOptions::default());
    session.set_selection(Selection::range(0, 2));
    session.toggle(StyleKind::Bold).unwrap();

    session.set_selection(Selection::caret(2));
    session.apply(insert(2, "c")).unwrap();
    assert!(session.is_active(StyleKind::Bold).unwrap());

    session.toggle(StyleKind::Bold).unwrap();
    assert!(!session.is_active(StyleKind::Bold).unwrap());
    session.apply(insert(3, "d")).unwrap();
    assert_eq!(session.to_markup(), "<b>abc</b>d");
}

#[test]
fn several_styles_staged_at_one_caret() {
    let mut session = Session::new(AttributedText::new("ab"), &StyleOptions::default());
    session.set_selection(Selection::caret(1));
    session.toggle(StyleKind::Bold).unwrap();
    session.toggle(StyleKind::Italic).unwrap();
    session.set_font_size(FontSize(24)).unwrap();

    session.apply(insert(1, "XY")).unwrap();
    assert_eq!(
        session.to_markup(),
        r#"a<b><i><span style="font-size:24px;">XY</span></i></b>b"#
    );
}

#[test]
fn typing_between_two_font_sizes_uses_the_left_one() {
    let mut session =
        Session::from_markup(r#"<span style="font-size:10px;">ab</span>cd"#, &StyleOptions::default())
            .unwrap();
    session.set_selection(Selection::range(2, 4));
    session.set_font_size(FontSize(20)).unwrap();

    session.set_selection(Selection::caret(2));
    session.set_font_size(FontSize(10)).unwrap();
    session.apply(insert(2, "!")).unwrap();
    assert_eq!(
        session.styles().font_size.value(),
        &CurrentValue::Value(FontSize(10))
    );
    // The typed run is its own span; importing the markup joins it back up.
    let markup = session.to_markup();
    assert_eq!(
        markup,
        concat!(
            r#"<span style="font-size:10px;">ab</span>"#,
            r#"<span style="font-size:10px;">!</span>"#,
            r#"<span style="font-size:20px;">cd</span>"#
        )
    );
    let reloaded = Session::from_markup(&markup, &StyleOptions::default()).unwrap();
    assert_eq!(
        reloaded.to_markup(),
        r#"<span style="font-size:10px;">ab!</span><span style="font-size:20px;">cd</span>"#
    );
}
