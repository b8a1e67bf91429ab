pub mod editing;
pub mod markup;
pub mod style;
pub mod text;

// Re-export key types for easier usage
pub use editing::{AtomicRegions, Cmd, EditError, NoAtomicRegions, Patch, Session};
pub use markup::{
    Attributes, MarkupController, ParseError, StyleMap, export_markup, import_markup,
};
pub use style::{
    ChangeHooks, Color, CurrentValue, FontSize, Link, LinkController, MultiSpanController,
    PendingSpan, Style, StyleKind, StyleOptions, StyleSet, ToggleController, ValuedKind,
};
pub use text::{
    AttributedText, BoundaryMode, InvariantViolation, Selection, SpanEntry, SpanError, SpanId,
};
