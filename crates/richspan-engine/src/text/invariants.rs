use crate::style::StyleKind;
use crate::text::{AttributedText, SpanId};

/// Two spans of a mergeable kind overlapping by at least one character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?} spans {first:?} and {second:?} overlap")]
pub struct InvariantViolation {
    pub kind: StyleKind,
    pub first: SpanId,
    pub second: SpanId,
}

/// Check the structural rules every controller operation must leave behind.
///
/// Bounds are asserted; overlap between mergeable spans of one kind is
/// reported. Link spans may overlap freely.
pub fn check(text: &AttributedText) -> Result<(), InvariantViolation> {
    let n = text.len();
    let spans: Vec<_> = text.iter_spans().collect();
    for (i, a) in spans.iter().enumerate() {
        assert!(
            a.range.start <= a.range.end && a.range.end <= n,
            "span out of bounds: {:?} (text len: {})",
            a.range,
            n
        );
        if !a.kind().is_mergeable() {
            continue;
        }
        for b in &spans[i + 1..] {
            if b.kind() == a.kind() && a.range.start < b.range.end && b.range.start < a.range.end {
                return Err(InvariantViolation {
                    kind: a.kind(),
                    first: a.id,
                    second: b.id,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Link, Style};
    use crate::text::BoundaryMode;

    #[test]
    fn overlapping_bold_is_reported() {
        let mut text = AttributedText::new("abcdef");
        let first = text.set_span(Style::Bold, 0..4, BoundaryMode::InclusiveInclusive).unwrap();
        let second = text.set_span(Style::Bold, 3..6, BoundaryMode::InclusiveInclusive).unwrap();
        assert_eq!(
            check(&text),
            Err(InvariantViolation {
                kind: StyleKind::Bold,
                first,
                second
            })
        );
    }

    #[test]
    fn touching_spans_and_links_are_fine() {
        let mut text = AttributedText::new("abcdef");
        text.set_span(Style::Bold, 0..3, BoundaryMode::InclusiveExclusive).unwrap();
        text.set_span(Style::Bold, 3..6, BoundaryMode::ExclusiveInclusive).unwrap();
        let link = Style::Link(Link::new("https://a.example"));
        text.set_span(link.clone(), 0..4, BoundaryMode::ExclusiveExclusive).unwrap();
        text.set_span(link, 2..6, BoundaryMode::ExclusiveExclusive).unwrap();
        assert_eq!(check(&text), Ok(()));
    }
}
