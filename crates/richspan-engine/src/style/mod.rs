//! # Style Controllers
//!
//! A [`Style`] is the value a span carries. Each [`StyleKind`] is owned by one
//! controller that implements apply, clear, value queries and the change
//! hooks for it:
//!
//! - [`ToggleController`] for presence-only kinds (bold, italic, underline,
//!   strikethrough)
//! - [`MultiSpanController`] for value-bearing kinds, parameterised over a
//!   [`ValuedKind`] (font size, color)
//! - [`LinkController`] for links, which are never merged
//!
//! [`StyleSet`] bundles one controller per kind in a fixed order; that order
//! is the order the markup importer tries them in.

pub mod kinds;
pub mod link;
pub mod multi;
pub mod ops;
pub mod pending;
pub mod set;
pub mod toggle;
pub mod values;

use std::fmt;

use serde::Serialize;

use crate::text::{AttributedText, Selection};

pub use kinds::{ColorKind, FontSizeKind};
pub use link::{LinkController, LinkKind};
pub use multi::{CurrentValue, MultiSpanController, ValuedKind};
pub use pending::{PendingSpan, Staged};
pub use set::{StyleOptions, StyleSet};
pub use toggle::ToggleController;
pub use values::{Color, FontSize, Link};

/// The value carried by a span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Style {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    FontSize(FontSize),
    Color(Color),
    Link(Link),
}

impl Style {
    pub fn kind(&self) -> StyleKind {
        match self {
            Style::Bold => StyleKind::Bold,
            Style::Italic => StyleKind::Italic,
            Style::Underline => StyleKind::Underline,
            Style::Strikethrough => StyleKind::Strikethrough,
            Style::FontSize(_) => StyleKind::FontSize,
            Style::Color(_) => StyleKind::Color,
            Style::Link(_) => StyleKind::Link,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::FontSize(size) => write!(f, "font-size:{size}"),
            Style::Color(color) => write!(f, "color:{color}"),
            Style::Link(link) => write!(f, "link:{}", link.url),
            toggle => write!(f, "{}", toggle.kind()),
        }
    }
}

/// Discriminant of [`Style`], used to query and group spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    FontSize,
    Color,
    Link,
}

impl StyleKind {
    /// Mergeable kinds hold at most one span per character; links are
    /// identified by span and may overlap.
    pub fn is_mergeable(self) -> bool {
        !matches!(self, StyleKind::Link)
    }

    pub fn name(self) -> &'static str {
        match self {
            StyleKind::Bold => "bold",
            StyleKind::Italic => "italic",
            StyleKind::Underline => "underline",
            StyleKind::Strikethrough => "strikethrough",
            StyleKind::FontSize => "font-size",
            StyleKind::Color => "color",
            StyleKind::Link => "link",
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hooks a host runs around every text edit.
///
/// `check_before_change` sees the buffer before the edit with the selection
/// the edit replaces; `check_after_change` sees it afterwards. A passive
/// after-change check (selection moved, nothing typed) only refreshes the
/// current value and drops any staged pending span.
pub trait ChangeHooks {
    fn check_before_change(&mut self, text: &mut AttributedText, selection: &Selection);

    fn check_after_change(&mut self, text: &mut AttributedText, selection: &Selection, passive: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_links_are_exclusive() {
        assert!(StyleKind::Bold.is_mergeable());
        assert!(StyleKind::FontSize.is_mergeable());
        assert!(StyleKind::Color.is_mergeable());
        assert!(!StyleKind::Link.is_mergeable());
    }

    #[test]
    fn display() {
        assert_eq!(Style::Bold.to_string(), "bold");
        assert_eq!(Style::FontSize(FontSize(14)).to_string(), "font-size:14px");
        assert_eq!(Style::Color(Color(0xff0000)).to_string(), "color:#ff0000");
        assert_eq!(
            Style::Link(Link::new("https://example.com")).to_string(),
            "link:https://example.com"
        );
    }
}
