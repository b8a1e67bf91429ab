use std::collections::HashMap;
use std::ops::Range;

use log::{debug, warn};

use crate::markup::tokenizer::{TagEvent, Tokenizer};
use crate::markup::{Attributes, MarkupController, ParseError};
use crate::style::{Style, StyleKind};
use crate::text::{AttributedText, BoundaryMode};

/// Parse `source` into an attributed buffer.
///
/// Each opening tag is offered to `controllers` in order and the first one
/// that recognizes it owns the resulting span. Every imported span is
/// `ExclusiveExclusive`.
pub fn import_markup(
    source: &str,
    controllers: &[&dyn MarkupController],
) -> Result<AttributedText, ParseError> {
    let mut session = ParseSession::new(controllers);
    for event in Tokenizer::new(source) {
        match event? {
            TagEvent::Open {
                name,
                attributes,
                self_closing,
            } => session.open(&name, &attributes, self_closing)?,
            TagEvent::Close { name } => session.close(&name)?,
            TagEvent::Text(chunk) => session.characters(&chunk),
        }
    }
    session.finish()
}

#[derive(Debug)]
struct OpenMarker {
    element: usize,
    style: Style,
    start: usize,
    controller: usize,
}

/// State of one import run.
///
/// `open` is the stack of open elements, innermost last. `markers` holds the
/// same elements grouped per kind so a close tag finds its kind's most
/// recent open marker without scanning. `base_depth` is the depth at the
/// first character data; once a close leaves the depth above it, no tag may
/// open until enough closes bring it back down.
struct ParseSession<'c> {
    controllers: &'c [&'c dyn MarkupController],
    text: String,
    spans: Vec<(Style, Range<usize>)>,
    open: Vec<(usize, String)>,
    markers: HashMap<StyleKind, Vec<OpenMarker>>,
    base_depth: Option<usize>,
    ending_mode: bool,
    next_element: usize,
}

impl<'c> ParseSession<'c> {
    fn new(controllers: &'c [&'c dyn MarkupController]) -> Self {
        Self {
            controllers,
            text: String::new(),
            spans: Vec::new(),
            open: Vec::new(),
            markers: HashMap::new(),
            base_depth: None,
            ending_mode: false,
            next_element: 0,
        }
    }

    fn depth(&self) -> usize {
        self.open.len()
    }

    fn open(&mut self, tag: &str, attributes: &Attributes, self_closing: bool) -> Result<(), ParseError> {
        if tag == "br" {
            self.text.push('\n');
            return Ok(());
        }

        let style_map = attributes.style_map();
        let controllers = self.controllers;
        for (ix, controller) in controllers.iter().enumerate() {
            let Some(style) = controller.style_from_tag(tag, &style_map, attributes) else {
                continue;
            };
            if self.ending_mode {
                return Err(ParseError::OpenBeforeClose {
                    tag: tag.to_string(),
                });
            }
            if self_closing {
                debug!("ignoring empty <{tag}/>");
                return Ok(());
            }
            let element = self.next_element;
            self.next_element += 1;
            self.markers
                .entry(controller.kind())
                .or_default()
                .push(OpenMarker {
                    element,
                    style,
                    start: self.text.len(),
                    controller: ix,
                });
            self.open.push((element, tag.to_string()));
            return Ok(());
        }

        if tag == "html" || tag == "body" || (tag == "p" && attributes.is_empty()) {
            return Ok(());
        }
        Err(ParseError::UnsupportedTag {
            tag: tag.to_string(),
            attrs: attributes.iter().map(|(n, v)| format!("{n}={v}")).collect(),
        })
    }

    fn close(&mut self, tag: &str) -> Result<(), ParseError> {
        if matches!(tag, "html" | "body" | "p" | "br") {
            return Ok(());
        }

        let innermost = self.open.last().map(|(element, _)| *element);
        let mut owned = false;
        let mut blocked = false;
        for controller in self.controllers {
            if !controller.owns_close_tag(tag) {
                continue;
            }
            owned = true;
            let Some(stack) = self.markers.get_mut(&controller.kind()) else {
                continue;
            };
            match stack.last() {
                Some(top) if Some(top.element) == innermost => {
                    if let Some(marker) = stack.pop() {
                        self.open.pop();
                        self.close_marker(marker);
                    }
                    return Ok(());
                }
                Some(_) => blocked = true,
                None => {}
            }
        }

        if !owned {
            debug!("ignoring close of unknown tag </{tag}>");
            return Ok(());
        }
        match self.open.last() {
            Some((_, expected)) if blocked => Err(ParseError::MisnestedClose {
                tag: tag.to_string(),
                expected: expected.clone(),
            }),
            _ => Err(ParseError::UnmatchedClose {
                tag: tag.to_string(),
            }),
        }
    }

    fn close_marker(&mut self, marker: OpenMarker) {
        let range = marker.start..self.text.len();
        let controller = self.controllers[marker.controller];
        if range.is_empty() {
            debug!("dropping empty {} at {}", marker.style, range.start);
        } else if !controller.accept(&marker.style) {
            warn!("rejecting {} over {:?}", marker.style, range);
        } else if marker.style.kind().is_mergeable() {
            self.add_mergeable(marker.style, range);
        } else {
            self.spans.push((marker.style, range));
        }

        let depth = self.depth();
        self.ending_mode = self.base_depth.is_some_and(|base| depth > base);
    }

    /// Add a span of a mergeable kind so that no two spans of the kind overlap.
    ///
    /// Spans already closed with another value keep their range; the new
    /// span only fills the gaps between them. Equal spans it overlaps or
    /// touches are absorbed.
    fn add_mergeable(&mut self, style: Style, range: Range<usize>) {
        let kind = style.kind();
        let mut fragments = vec![range];
        for (other, taken) in &self.spans {
            if other.kind() != kind || *other == style {
                continue;
            }
            fragments = fragments
                .into_iter()
                .flat_map(|fragment| subtract(fragment, taken))
                .collect();
        }

        for fragment in fragments {
            let mut merged = fragment;
            self.spans.retain(|(other, taken)| {
                if *other == style && taken.start <= merged.end && taken.end >= merged.start {
                    merged = merged.start.min(taken.start)..merged.end.max(taken.end);
                    false
                } else {
                    true
                }
            });
            self.spans.push((style.clone(), merged));
        }
    }

    fn characters(&mut self, chunk: &str) {
        if self.base_depth.is_none() {
            self.base_depth = Some(self.depth());
        }
        let mut out = String::with_capacity(chunk.len());
        for c in chunk.chars() {
            if c == ' ' || c == '\n' {
                let pred = out
                    .chars()
                    .next_back()
                    .or_else(|| self.text.chars().next_back())
                    .unwrap_or('\n');
                if pred != ' ' && pred != '\n' {
                    out.push(' ');
                }
            } else {
                out.push(c);
            }
        }
        self.text.push_str(&out);
    }

    fn finish(self) -> Result<AttributedText, ParseError> {
        if let Some((element, tag)) = self.open.first() {
            let offset = self
                .markers
                .values()
                .flatten()
                .find(|marker| marker.element == *element)
                .map_or(0, |marker| marker.start);
            return Err(ParseError::Unclosed {
                tag: tag.clone(),
                offset,
            });
        }

        let mut text = AttributedText::new(&self.text);
        for (style, range) in self.spans {
            text.insert_span(style, range, BoundaryMode::ExclusiveExclusive);
        }
        Ok(text)
    }
}

/// Parts of `range` not covered by `taken`.
fn subtract(range: Range<usize>, taken: &Range<usize>) -> Vec<Range<usize>> {
    if taken.end <= range.start || taken.start >= range.end {
        return vec![range];
    }
    let mut parts = Vec::with_capacity(2);
    if range.start < taken.start {
        parts.push(range.start..taken.start);
    }
    if taken.end < range.end {
        parts.push(taken.end..range.end);
    }
    parts
}
