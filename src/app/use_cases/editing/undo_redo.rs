//! Use-Case: Undo/Redo über die Patch-History.

use crate::app::state::PendingEdit;
use crate::app::AppState;

/// Führt einen Undo-Schritt aus bzw. stellt ihn während des Free-Runs zurück.
pub fn undo(state: &mut AppState) -> anyhow::Result<()> {
    if state.simulation.is_running() {
        state.simulation.queue(PendingEdit::Undo);
        log::debug!("Undo bis Zyklusende zurückgestellt");
        return Ok(());
    }
    undo_now(state)
}

/// Führt einen Redo-Schritt aus bzw. stellt ihn während des Free-Runs zurück.
pub fn redo(state: &mut AppState) -> anyhow::Result<()> {
    if state.simulation.is_running() {
        state.simulation.queue(PendingEdit::Redo);
        log::debug!("Redo bis Zyklusende zurückgestellt");
        return Ok(());
    }
    redo_now(state)
}

/// Nimmt den letzten Undo-Eintrag sofort zurück.
pub fn undo_now(state: &mut AppState) -> anyhow::Result<()> {
    match state.history.undo(&mut state.program)? {
        Some(label) => {
            state.dirty = true;
            log::info!("Undo ausgeführt: {}", label);
        }
        None => log::debug!("Undo: nichts zu tun"),
    }
    Ok(())
}

/// Stellt den letzten Redo-Eintrag sofort wieder her.
pub fn redo_now(state: &mut AppState) -> anyhow::Result<()> {
    match state.history.redo(&mut state.program)? {
        Some(label) => {
            state.dirty = true;
            log::info!("Redo ausgeführt: {}", label);
        }
        None => log::debug!("Redo: nichts zu tun"),
    }
    Ok(())
}
