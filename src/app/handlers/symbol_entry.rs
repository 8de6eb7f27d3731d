//! Handler für die Symbol-Eingabe.

use crate::app::state::{SymbolCommit, SymbolInstruction};
use crate::app::use_cases;
use crate::app::AppState;
use crate::core::RungId;

/// Öffnet die Symbol-Eingabe.
pub fn open(state: &mut AppState, instruction: SymbolInstruction) {
    use_cases::symbol_entry::open(state, instruction);
}

/// Schließt die Symbol-Eingabe ohne Commit.
pub fn close(state: &mut AppState) {
    state.symbol_entry.close();
}

/// Übernimmt einen Tastendruck-Stand des Geräte-Texts.
pub fn set_device_text(state: &mut AppState, text: &str) {
    use_cases::symbol_entry::set_device_text(state, text);
}

/// Wechselt die Anweisung.
pub fn set_instruction(state: &mut AppState, instruction: SymbolInstruction) {
    state.symbol_entry.instruction = instruction;
}

/// Setzt "Symbol fortlaufend eingeben".
pub fn set_continuous(state: &mut AppState, enabled: bool) {
    state.symbol_entry.enter_symbol_continuously = enabled;
}

/// Setzt "Gerätekommentar fortlaufend eingeben".
pub fn set_device_comment_continuous(state: &mut AppState, enabled: bool) {
    state.symbol_entry.enter_device_comment_continuously = enabled;
}

/// Bestätigt die Eingabe und platziert das Symbol.
pub fn confirm(state: &mut AppState, rung: RungId) -> anyhow::Result<()> {
    use_cases::symbol_entry::confirm(state, rung)
}

/// Platziert ein extern erzeugtes Commit-Event.
pub fn place(state: &mut AppState, rung: RungId, commit: &SymbolCommit) -> anyhow::Result<()> {
    use_cases::editing::place_symbol(state, rung, commit)
}
