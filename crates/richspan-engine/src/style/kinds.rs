use crate::markup::{Attributes, StyleMap};
use crate::style::{Color, FontSize, MultiSpanController, Style, StyleKind, ValuedKind};

pub type FontSizeController = MultiSpanController<FontSizeKind>;
pub type ColorController = MultiSpanController<ColorKind>;

/// `<span style="font-size:14px;">`
pub struct FontSizeKind;

impl ValuedKind for FontSizeKind {
    type Value = FontSize;

    const KIND: StyleKind = StyleKind::FontSize;

    fn tag_name() -> &'static str {
        "span"
    }

    fn wrap(value: FontSize) -> Style {
        Style::FontSize(value)
    }

    fn value_from_style(style: &Style) -> Option<FontSize> {
        match style {
            Style::FontSize(size) => Some(*size),
            _ => None,
        }
    }

    fn from_tag(style_map: &StyleMap, _attributes: &Attributes) -> Option<FontSize> {
        style_map.get("font-size").and_then(|v| FontSize::parse(v))
    }

    fn open_tag(value: &FontSize) -> String {
        format!("<span style=\"font-size:{value};\">")
    }
}

/// `<span style="color:#rrggbb;">`
pub struct ColorKind;

impl ValuedKind for ColorKind {
    type Value = Color;

    const KIND: StyleKind = StyleKind::Color;

    fn tag_name() -> &'static str {
        "span"
    }

    fn wrap(value: Color) -> Style {
        Style::Color(value)
    }

    fn value_from_style(style: &Style) -> Option<Color> {
        match style {
            Style::Color(color) => Some(*color),
            _ => None,
        }
    }

    fn from_tag(style_map: &StyleMap, _attributes: &Attributes) -> Option<Color> {
        style_map.get("color").and_then(|v| Color::parse(v))
    }

    fn open_tag(value: &Color) -> String {
        format!("<span style=\"color:{value};\">")
    }
}
