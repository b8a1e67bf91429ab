use std::ops::Range;

/// Commands that can be applied to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
}

impl Cmd {
    /// The range of the current text the command replaces.
    pub fn range(&self) -> Range<usize> {
        match self {
            Cmd::InsertText { at, .. } => *at..*at,
            Cmd::DeleteRange { range } | Cmd::ReplaceRange { range, .. } => range.clone(),
        }
    }

    /// The text the command puts in place of [`Cmd::range`].
    pub fn text(&self) -> &str {
        match self {
            Cmd::InsertText { text, .. } | Cmd::ReplaceRange { text, .. } => text,
            Cmd::DeleteRange { .. } => "",
        }
    }
}
