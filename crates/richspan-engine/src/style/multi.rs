use std::fmt;
use std::marker::PhantomData;

use log::trace;

use crate::markup::{Attributes, MarkupController, StyleMap};
use crate::style::ops::{self, commit_pending_after_edit, commit_pending_before_edit};
use crate::style::{ChangeHooks, PendingSpan, Style, StyleKind};
use crate::text::{AttributedText, BoundaryMode, Selection, SpanEntry, SpanError, invariants};

/// Effective value of a valued style at a selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CurrentValue<V> {
    /// No span and no default.
    #[default]
    Unset,
    Value(V),
    /// The selection covers more than one distinct value.
    Mixed,
}

impl<V> CurrentValue<V> {
    pub fn value(&self) -> Option<&V> {
        match self {
            CurrentValue::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, CurrentValue::Mixed)
    }
}

impl<V> From<Option<V>> for CurrentValue<V> {
    fn from(value: Option<V>) -> Self {
        value.map_or(CurrentValue::Unset, CurrentValue::Value)
    }
}

/// One value-bearing attribute: how its values map to [`Style`] and to markup.
pub trait ValuedKind {
    type Value: Clone + PartialEq + fmt::Debug;

    const KIND: StyleKind;

    fn tag_name() -> &'static str;

    fn wrap(value: Self::Value) -> Style;

    fn value_from_style(style: &Style) -> Option<Self::Value>;

    /// Build a value from an opening tag's style map and attributes.
    fn from_tag(style_map: &StyleMap, attributes: &Attributes) -> Option<Self::Value>;

    fn open_tag(value: &Self::Value) -> String;

    fn close_tag() -> String {
        format!("</{}>", Self::tag_name())
    }

    /// Whether a value may become a span at all.
    fn accept(_value: &Self::Value) -> bool {
        true
    }

    fn creation_mode() -> BoundaryMode {
        BoundaryMode::InclusiveInclusive
    }
}

type Listener<V> = Box<dyn FnMut(&CurrentValue<V>)>;

/// Controller for a value-bearing style such as font size or color.
pub struct MultiSpanController<K: ValuedKind> {
    default: Option<K::Value>,
    pending: PendingSpan<Style>,
    value: CurrentValue<K::Value>,
    listeners: Vec<Listener<K::Value>>,
    _kind: PhantomData<K>,
}

impl<K: ValuedKind> MultiSpanController<K> {
    pub fn new(default: Option<K::Value>) -> Self {
        Self {
            default,
            pending: PendingSpan::new(),
            value: CurrentValue::Unset,
            listeners: Vec::new(),
            _kind: PhantomData,
        }
    }

    pub fn default_value(&self) -> Option<&K::Value> {
        self.default.as_ref()
    }

    pub fn pending(&self) -> &PendingSpan<Style> {
        &self.pending
    }

    /// Last value reported to listeners.
    pub fn value(&self) -> &CurrentValue<K::Value> {
        &self.value
    }

    pub fn on_change(&mut self, listener: impl FnMut(&CurrentValue<K::Value>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn default_current(&self) -> CurrentValue<K::Value> {
        self.default.clone().into()
    }

    fn entry_value(entry: &SpanEntry) -> Option<K::Value> {
        K::value_from_style(&entry.style)
    }

    /// Compute the value at the real selection without notifying anyone.
    pub fn resolve(&self, text: &AttributedText, selection: &Selection) -> CurrentValue<K::Value> {
        let real = selection.real();
        if selection.is_real_caret()
            && let Some(staged) = self.pending.staged()
            && staged.range.start == real.start
        {
            return K::value_from_style(&staged.style).into();
        }

        let spans = text.spans(real.clone(), K::KIND);
        let Some(first) = spans.first() else {
            return self.default_current();
        };
        let Some(first_value) = Self::entry_value(first) else {
            return self.default_current();
        };

        if spans.len() > 1 && selection.is_real_caret() {
            // The caret sits where one run ends and the next begins.
            let chosen = if first.mode == BoundaryMode::InclusiveExclusive {
                Self::entry_value(&spans[1])
            } else {
                Some(first_value)
            };
            return chosen.into();
        }

        if spans.len() > 1 {
            let all_equal = spans
                .iter()
                .all(|entry| Self::entry_value(entry).as_ref() == Some(&first_value));
            return if all_equal {
                CurrentValue::Value(first_value)
            } else {
                CurrentValue::Mixed
            };
        }

        if self.default.as_ref() != Some(&first_value)
            && (first.range.start > real.start || first.range.end < real.end)
        {
            return CurrentValue::Mixed;
        }
        CurrentValue::Value(first_value)
    }

    /// Compute the value at the real selection and notify listeners if it changed.
    pub fn current_value(&mut self, text: &AttributedText, selection: &Selection) -> CurrentValue<K::Value> {
        let value = self.resolve(text, selection);
        self.check_value_change(value.clone());
        value
    }

    fn check_value_change(&mut self, value: CurrentValue<K::Value>) {
        if value == self.value {
            return;
        }
        trace!("{} value changed: {:?} -> {:?}", K::KIND, self.value, value);
        self.value = value;
        for listener in &mut self.listeners {
            listener(&self.value);
        }
    }

    /// Set `value` over the logical selection.
    ///
    /// Existing spans of this kind are cut back to the outside of the
    /// selection, then one span carrying `value` is inserted, absorbing
    /// equal neighbours. At a caret the value is staged for the next typed
    /// character instead.
    pub fn apply(
        &mut self,
        value: K::Value,
        text: &mut AttributedText,
        selection: &Selection,
    ) -> Result<(), SpanError> {
        text.check_range(&selection.logical())?;
        if selection.is_caret() {
            self.pending.stage(
                K::wrap(value.clone()),
                selection.start..selection.start,
                K::creation_mode(),
            );
        } else {
            ops::clear_range(text, K::KIND, &selection.logical());
            ops::merge_range(text, K::wrap(value.clone()), selection.logical(), K::creation_mode());
            debug_assert_eq!(invariants::check(text), Ok(()));
        }
        self.check_value_change(CurrentValue::Value(value));
        Ok(())
    }

    /// Remove this kind from the logical selection. A caret clears nothing.
    pub fn clear(&mut self, text: &mut AttributedText, selection: &Selection) -> Result<(), SpanError> {
        text.check_range(&selection.logical())?;
        if !selection.is_caret() {
            ops::clear_range(text, K::KIND, &selection.logical());
            debug_assert_eq!(invariants::check(text), Ok(()));
        }
        self.current_value(text, selection);
        Ok(())
    }
}

impl<K: ValuedKind> ChangeHooks for MultiSpanController<K> {
    fn check_before_change(&mut self, text: &mut AttributedText, selection: &Selection) {
        commit_pending_before_edit(text, K::KIND, &mut self.pending, selection);
    }

    fn check_after_change(&mut self, text: &mut AttributedText, selection: &Selection, passive: bool) {
        commit_pending_after_edit(text, &mut self.pending, passive);
        self.current_value(text, selection);
    }
}

impl<K: ValuedKind> MarkupController for MultiSpanController<K> {
    fn kind(&self) -> StyleKind {
        K::KIND
    }

    fn style_from_tag(&self, tag: &str, style_map: &StyleMap, attributes: &Attributes) -> Option<Style> {
        if tag != K::tag_name() {
            return None;
        }
        K::from_tag(style_map, attributes).map(K::wrap)
    }

    fn owns_close_tag(&self, tag: &str) -> bool {
        tag == K::tag_name()
    }

    fn accept(&self, style: &Style) -> bool {
        K::value_from_style(style).is_some_and(|value| K::accept(&value))
    }

    fn open_tag(&self, style: &Style) -> String {
        K::value_from_style(style)
            .map(|value| K::open_tag(&value))
            .unwrap_or_default()
    }

    fn close_tag(&self) -> String {
        K::close_tag()
    }
}
