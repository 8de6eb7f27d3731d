//! Use-Case-Funktionen der Symbol-Eingabe.

use super::editing;
use crate::app::state::SymbolInstruction;
use crate::app::AppState;
use crate::core::RungId;

/// Öffnet die Symbol-Eingabe.
pub fn open(state: &mut AppState, instruction: SymbolInstruction) {
    state.symbol_entry.open(instruction);
    log::debug!("Symbol-Eingabe geöffnet: {:?}", instruction);
}

/// Validiert den Geräte-Text eines Tastendrucks.
///
/// Ungültiger Text ist kein Fehler des Controllers: der Fehler steht im
/// State, der letzte gültige Text bleibt erhalten.
pub fn set_device_text(state: &mut AppState, text: &str) {
    if let Err(err) = state.symbol_entry.set_device_text(text) {
        log::debug!("Symbol-Eingabe '{}': {}", text, err);
    }
}

/// Übernimmt die Eingabe und platziert das Element im Strompfad.
pub fn confirm(state: &mut AppState, rung: RungId) -> anyhow::Result<()> {
    match state.symbol_entry.commit() {
        Some(commit) => editing::place_symbol(state, rung, &commit),
        None => {
            log::debug!("Symbol-Eingabe: nichts zu übernehmen");
            Ok(())
        }
    }
}
