//! # Markup Import and Export
//!
//! Converts between [`AttributedText`](crate::text::AttributedText) and an
//! HTML-like markup:
//!
//! ```text
//! <b>bold <i>both</i></b><br><span style="color:#ff0000;">red</span>
//! <a href="https://example.com" alt="">link</a>
//! ```
//!
//! Each style kind's tags are owned by its controller through
//! [`MarkupController`]; the importer and exporter only know the ordered
//! controller list. Import is strict: unknown tags, crossing close tags and
//! unclosed tags are errors.

pub mod attributes;
pub mod cursor;
pub mod export;
pub mod import;
pub mod tokenizer;

use crate::style::{Style, StyleKind};

pub use attributes::{Attributes, StyleMap, parse_style_attribute};
pub use export::export_markup;
pub use import::import_markup;
pub use tokenizer::{TagEvent, Tokenizer};

/// Markup conversion for one style kind.
pub trait MarkupController {
    fn kind(&self) -> StyleKind;

    /// The style an opening tag stands for, if this controller recognizes it.
    fn style_from_tag(&self, tag: &str, style_map: &StyleMap, attributes: &Attributes) -> Option<Style>;

    fn owns_close_tag(&self, tag: &str) -> bool;

    /// Whether an imported span carrying `style` should be kept.
    fn accept(&self, _style: &Style) -> bool {
        true
    }

    fn open_tag(&self, style: &Style) -> String;

    fn close_tag(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported tag <{tag}>{}", format_attrs(.attrs))]
    UnsupportedTag { tag: String, attrs: Vec<String> },

    #[error("<{tag}> opened while a close tag is still unmatched")]
    OpenBeforeClose { tag: String },

    #[error("</{tag}> closes across <{expected}>")]
    MisnestedClose { tag: String, expected: String },

    #[error("</{tag}> has no matching open tag")]
    UnmatchedClose { tag: String },

    #[error("<{tag}> opened at offset {offset} is never closed")]
    Unclosed { tag: String, offset: usize },

    #[error("syntax error at byte {offset}: {reason}")]
    Syntax { offset: usize, reason: &'static str },
}

fn format_attrs(attrs: &[String]) -> String {
    if attrs.is_empty() {
        String::new()
    } else {
        format!(" with attributes {}", attrs.join(", "))
    }
}
