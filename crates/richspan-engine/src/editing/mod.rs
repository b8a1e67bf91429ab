/*!
 * # Editing Session
 *
 * A [`Session`] ties an [`AttributedText`](crate::text::AttributedText) to
 * a selection and the full [`StyleSet`](crate::style::StyleSet), and is the
 * only place text edits run through the controllers' change hooks.
 *
 * ## Edit pipeline
 *
 * Every edit is a [`Cmd`]. Applying one:
 *
 * 1. asks the [`AtomicRegions`] predicate whether the edit is allowed at all
 * 2. runs `check_before_change` on every controller (commits pending spans)
 * 3. replaces the text, carrying spans through the delta
 * 4. deletes any atomic region the edit broke, under a re-entrancy guard
 * 5. moves the caret to the end of the inserted text
 * 6. runs `check_after_change` and bumps the version
 *
 * The result is a [`Patch`] describing what changed.
 *
 * ```rust
 * use richspan_engine::editing::{Cmd, Session};
 *
 * let mut session = Session::from_markup("<b>bd</b>", &Default::default()).unwrap();
 * session.set_selection((1..1).into());
 * session.apply(Cmd::InsertText { at: 1, text: "ol".to_string() }).unwrap();
 * assert_eq!(session.to_markup(), "<b>bold</b>");
 * ```
 */

pub mod atomic;
pub mod commands;
pub mod patch;
pub mod session;

pub use atomic::{AtomicRegions, NoAtomicRegions};
pub use commands::Cmd;
pub use patch::Patch;
pub use session::{EditError, Session};
