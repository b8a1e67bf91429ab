use crate::markup::MarkupController;
use crate::style::kinds::{ColorController, FontSizeController};
use crate::style::{ChangeHooks, Color, FontSize, LinkController, StyleKind, ToggleController};
use crate::text::{AttributedText, Selection};

/// Settings the controllers take from their host.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleOptions {
    pub default_font_size: FontSize,
    pub default_color: Color,
    pub link_auto_url_fix: bool,
    pub link_inseparable: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            default_font_size: FontSize(16),
            default_color: Color::BLACK,
            link_auto_url_fix: true,
            link_inseparable: true,
        }
    }
}

/// One controller per style kind, in registration order.
pub struct StyleSet {
    pub bold: ToggleController,
    pub italic: ToggleController,
    pub underline: ToggleController,
    pub strikethrough: ToggleController,
    pub font_size: FontSizeController,
    pub color: ColorController,
    pub link: LinkController,
}

impl StyleSet {
    pub fn new(options: &StyleOptions) -> Self {
        Self {
            bold: ToggleController::bold(),
            italic: ToggleController::italic(),
            underline: ToggleController::underline(),
            strikethrough: ToggleController::strikethrough(),
            font_size: FontSizeController::new(Some(options.default_font_size)),
            color: ColorController::new(Some(options.default_color)),
            link: LinkController::new(options.link_auto_url_fix, options.link_inseparable),
        }
    }

    /// Controllers in the order the importer tries them.
    pub fn markup_controllers(&self) -> Vec<&dyn MarkupController> {
        let controllers: [&dyn MarkupController; 7] = [
            &self.bold,
            &self.italic,
            &self.underline,
            &self.strikethrough,
            &self.font_size,
            &self.color,
            &self.link,
        ];
        controllers.to_vec()
    }

    /// The on/off controller for `kind`, if it is one.
    pub fn toggle(&self, kind: StyleKind) -> Option<&ToggleController> {
        match kind {
            StyleKind::Bold => Some(&self.bold),
            StyleKind::Italic => Some(&self.italic),
            StyleKind::Underline => Some(&self.underline),
            StyleKind::Strikethrough => Some(&self.strikethrough),
            StyleKind::FontSize | StyleKind::Color | StyleKind::Link => None,
        }
    }

    pub fn toggle_mut(&mut self, kind: StyleKind) -> Option<&mut ToggleController> {
        match kind {
            StyleKind::Bold => Some(&mut self.bold),
            StyleKind::Italic => Some(&mut self.italic),
            StyleKind::Underline => Some(&mut self.underline),
            StyleKind::Strikethrough => Some(&mut self.strikethrough),
            StyleKind::FontSize | StyleKind::Color | StyleKind::Link => None,
        }
    }

    fn hooks_mut(&mut self) -> [&mut dyn ChangeHooks; 7] {
        [
            &mut self.bold,
            &mut self.italic,
            &mut self.underline,
            &mut self.strikethrough,
            &mut self.font_size,
            &mut self.color,
            &mut self.link,
        ]
    }
}

impl Default for StyleSet {
    fn default() -> Self {
        Self::new(&StyleOptions::default())
    }
}

impl ChangeHooks for StyleSet {
    fn check_before_change(&mut self, text: &mut AttributedText, selection: &Selection) {
        for hooks in self.hooks_mut() {
            hooks.check_before_change(text, selection);
        }
    }

    fn check_after_change(&mut self, text: &mut AttributedText, selection: &Selection, passive: bool) {
        for hooks in self.hooks_mut() {
            hooks.check_after_change(text, selection, passive);
        }
    }
}
