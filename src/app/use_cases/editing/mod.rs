//! Use-Case-Funktionen für die Programmbearbeitung.
//!
//! Aufgeteilt nach Operation:
//! - `apply_edit`: Bearbeitung planen und über die History anwenden
//! - `undo_redo`: History abspielen
//! - `place_symbol`: Commit-Event der Symbol-Eingabe platzieren

mod apply_edit;
mod place_symbol;
mod undo_redo;

pub use apply_edit::{apply_edit, commit_edit};
pub use place_symbol::{place_symbol, symbol_column};
pub use undo_redo::{redo, redo_now, undo, undo_now};
