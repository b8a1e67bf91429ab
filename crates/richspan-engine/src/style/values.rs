use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Font size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontSize(pub u32);

impl FontSize {
    /// Parse a CSS length such as `14px` or `14`. Other units are not supported.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let number = value.strip_suffix("px").unwrap_or(value).trim_end();
        number.parse().ok().filter(|px| *px > 0).map(FontSize)
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b))
    }

    /// Parse `#rgb`, `#rrggbb` or `rgb(r, g, b)`.
    pub fn parse(value: &str) -> Option<Self> {
        static HEX: OnceLock<Regex> = OnceLock::new();
        static RGB: OnceLock<Regex> = OnceLock::new();
        let hex = HEX.get_or_init(|| {
            Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("Invalid hex color regex")
        });
        let rgb = RGB.get_or_init(|| {
            Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$")
                .expect("Invalid rgb color regex")
        });

        let value = value.trim();
        if let Some(caps) = hex.captures(value) {
            let digits = &caps[1];
            let expanded: String = if digits.len() == 3 {
                digits.chars().flat_map(|c| [c, c]).collect()
            } else {
                digits.to_string()
            };
            return u32::from_str_radix(&expanded, 16).ok().map(Color);
        }
        if let Some(caps) = rgb.captures(value) {
            let channel = |i: usize| caps[i].parse::<u8>().ok();
            return Some(Color::rgb(channel(1)?, channel(2)?, channel(3)?));
        }
        None
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0xffffff)
    }
}

/// Hyperlink target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    pub url: String,
    pub alt: String,
    /// Whether the host should treat the linked text as one atomic region.
    pub inseparable: bool,
}

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: String::new(),
            inseparable: true,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }
}
