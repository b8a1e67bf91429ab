use html_escape::encode_double_quoted_attribute;
use log::warn;

use crate::markup::{Attributes, MarkupController, StyleMap};
use crate::style::{ChangeHooks, CurrentValue, Link, MultiSpanController, Style, StyleKind, ValuedKind};
use crate::text::{AttributedText, BoundaryMode, Selection, SpanId, SpanError};

/// `<a href="…" alt="…">`
pub struct LinkKind;

impl ValuedKind for LinkKind {
    type Value = Link;

    const KIND: StyleKind = StyleKind::Link;

    fn tag_name() -> &'static str {
        "a"
    }

    fn wrap(value: Link) -> Style {
        Style::Link(value)
    }

    fn value_from_style(style: &Style) -> Option<Link> {
        match style {
            Style::Link(link) => Some(link.clone()),
            _ => None,
        }
    }

    fn from_tag(_style_map: &StyleMap, attributes: &Attributes) -> Option<Link> {
        let href = attributes.get("href").unwrap_or_default();
        let alt = attributes.get("alt").unwrap_or_default();
        Some(Link::new(href).with_alt(alt))
    }

    fn open_tag(value: &Link) -> String {
        format!(
            "<a href=\"{}\" alt=\"{}\">",
            encode_double_quoted_attribute(&value.url),
            encode_double_quoted_attribute(&value.alt)
        )
    }

    /// Empty targets and bare fragment links are dropped.
    fn accept(value: &Link) -> bool {
        let url = value.url.trim();
        !url.is_empty() && url != "#"
    }

    fn creation_mode() -> BoundaryMode {
        BoundaryMode::ExclusiveExclusive
    }
}

/// Controller for hyperlinks.
///
/// Links are identified by their span, so unlike the other valued kinds they
/// are never cut or merged: applying adds a new span over the real
/// selection and clearing removes whole links.
pub struct LinkController {
    inner: MultiSpanController<LinkKind>,
    auto_url_fix: bool,
    inseparable: bool,
}

impl LinkController {
    pub fn new(auto_url_fix: bool, inseparable: bool) -> Self {
        Self {
            inner: MultiSpanController::new(None),
            auto_url_fix,
            inseparable,
        }
    }

    pub fn on_change(&mut self, listener: impl FnMut(&CurrentValue<Link>) + 'static) {
        self.inner.on_change(listener);
    }

    pub fn value(&self) -> &CurrentValue<Link> {
        self.inner.value()
    }

    pub fn resolve(&self, text: &AttributedText, selection: &Selection) -> CurrentValue<Link> {
        self.inner.resolve(text, selection)
    }

    pub fn current_value(&mut self, text: &AttributedText, selection: &Selection) -> CurrentValue<Link> {
        self.inner.current_value(text, selection)
    }

    /// Link the real selection to `link`.
    ///
    /// Returns `Ok(None)` when nothing is selected or the target is rejected.
    pub fn apply(
        &mut self,
        mut link: Link,
        text: &mut AttributedText,
        selection: &Selection,
    ) -> Result<Option<SpanId>, SpanError> {
        let real = selection.real();
        text.check_range(&real)?;
        if real.is_empty() {
            return Ok(None);
        }
        if !LinkKind::accept(&link) {
            warn!("rejecting link to {:?}", link.url);
            return Ok(None);
        }
        link.inseparable = self.inseparable;
        let id = text.insert_span(Style::Link(link), real, LinkKind::creation_mode());
        self.inner.current_value(text, selection);
        Ok(Some(id))
    }

    /// Remove every link intersecting the logical selection.
    pub fn clear(&mut self, text: &mut AttributedText, selection: &Selection) -> Vec<SpanId> {
        let removed: Vec<SpanId> = text
            .spans(selection.logical(), StyleKind::Link)
            .into_iter()
            .map(|entry| entry.id)
            .collect();
        for id in &removed {
            text.remove_span(*id);
        }
        self.inner.current_value(text, selection);
        removed
    }

    /// Prefix scheme-less URLs with `http://` when enabled.
    pub fn fix_url<'a>(&self, url: &'a str) -> std::borrow::Cow<'a, str> {
        if !self.auto_url_fix || url.contains("://") || url.contains("mailto:") {
            url.into()
        } else {
            format!("http://{url}").into()
        }
    }
}

impl Default for LinkController {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl ChangeHooks for LinkController {
    fn check_before_change(&mut self, text: &mut AttributedText, selection: &Selection) {
        self.inner.check_before_change(text, selection);
    }

    fn check_after_change(&mut self, text: &mut AttributedText, selection: &Selection, passive: bool) {
        self.inner.check_after_change(text, selection, passive);
    }
}

impl MarkupController for LinkController {
    fn kind(&self) -> StyleKind {
        StyleKind::Link
    }

    fn style_from_tag(&self, tag: &str, style_map: &StyleMap, attributes: &Attributes) -> Option<Style> {
        match self.inner.style_from_tag(tag, style_map, attributes)? {
            Style::Link(mut link) => {
                link.inseparable = self.inseparable;
                Some(Style::Link(link))
            }
            _ => None,
        }
    }

    fn owns_close_tag(&self, tag: &str) -> bool {
        self.inner.owns_close_tag(tag)
    }

    fn accept(&self, style: &Style) -> bool {
        self.inner.accept(style)
    }

    fn open_tag(&self, style: &Style) -> String {
        let Style::Link(link) = style else {
            return String::new();
        };
        let fixed = Link {
            url: self.fix_url(&link.url).into_owned(),
            ..link.clone()
        };
        LinkKind::open_tag(&fixed)
    }

    fn close_tag(&self) -> String {
        LinkKind::close_tag()
    }
}
