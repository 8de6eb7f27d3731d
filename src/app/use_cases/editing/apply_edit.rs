//! Use-Case: Bearbeitungsbefehl planen und als Undo-Schritt anwenden.

use crate::app::state::PendingEdit;
use crate::app::AppState;
use crate::core::{plan, EditCommand};

/// Wendet einen Bearbeitungsbefehl an.
///
/// Läuft der Free-Run, wird der Befehl sofort geprüft und dann bis zum
/// nächsten Zyklusende zurückgestellt. Ein Prüffehler wird in beiden Fällen
/// synchron geliefert, das Programm bleibt dann unverändert.
pub fn apply_edit(state: &mut AppState, command: EditCommand) -> anyhow::Result<()> {
    if state.simulation.is_running() {
        if let Err(err) = plan(&state.program, &command) {
            log::warn!("{} abgelehnt: {}", command.label(), err);
            return Err(err.into());
        }
        log::info!("{} bis Zyklusende zurückgestellt", command.label());
        state.simulation.queue(PendingEdit::Edit(command));
        return Ok(());
    }
    commit_edit(state, &command)
}

/// Plant den Befehl gegen das aktuelle Programm und wendet ihn über die History an.
pub fn commit_edit(state: &mut AppState, command: &EditCommand) -> anyhow::Result<()> {
    let label = command.label();
    let patch = match plan(&state.program, command) {
        Ok(patch) => patch,
        Err(err) => {
            log::warn!("{} abgelehnt: {}", label, err);
            return Err(err.into());
        }
    };
    if patch.is_empty() {
        log::debug!("{}: keine Änderung", label);
        return Ok(());
    }

    let op_count = patch.ops.len();
    state.history.apply(&mut state.program, label, patch)?;
    state.dirty = true;
    log::info!("{} ausgeführt ({} Patch-Operationen)", label, op_count);
    Ok(())
}
