//! Use-Case-Funktionen für die Simulation (Einzelschritt, Free-Run).
//!
//! Zyklen und Bearbeitungen überlappen nie: wartende Bearbeitungen werden
//! ausschließlich zwischen zwei Zyklen angewendet.

use super::editing;
use crate::app::state::PendingEdit;
use crate::app::AppState;
use crate::scan;
use crate::shared::MAX_CYCLES_PER_TICK;

/// Führt genau einen Scan-Zyklus aus (CYCLE_SCAN).
pub fn step(state: &mut AppState) {
    run_one_cycle(state);
    if let Some(report) = &state.simulation.last_report {
        log::info!(
            "Zyklus {}: {} Änderungen, {} Fehler",
            state.simulation.cycle_count,
            report.changed.len(),
            report.faults.len()
        );
    }
}

/// Startet den Free-Run.
pub fn start(state: &mut AppState) {
    if state.simulation.start() {
        log::info!(
            "Free-Run gestartet (Periode {} ms)",
            state.options.effective_scan_period_ms()
        );
    } else {
        log::debug!("Free-Run läuft bereits");
    }
}

/// Stoppt den Free-Run. Der zuletzt abgeschlossene Zustand bleibt erhalten,
/// wartende Bearbeitungen werden jetzt angewendet.
pub fn stop(state: &mut AppState) {
    if state.simulation.stop() {
        flush_pending(state);
        log::info!("Free-Run gestoppt nach Zyklus {}", state.simulation.cycle_count);
    } else {
        log::debug!("Free-Run: nichts zu stoppen");
    }
}

/// Bringt den Free-Run um `elapsed_ms` Host-Zeit voran.
pub fn advance(state: &mut AppState, elapsed_ms: u64) {
    if !state.simulation.is_running() {
        log::debug!("Free-Run: Tick ohne laufende Simulation");
        return;
    }
    let due = state.simulation.advance(
        elapsed_ms,
        state.options.effective_scan_period_ms(),
        MAX_CYCLES_PER_TICK,
    );
    for _ in 0..due {
        let clean = run_one_cycle(state);
        if !clean && state.options.stop_on_fault {
            log::warn!(
                "Free-Run angehalten: Zyklus {} meldet Fehler",
                state.simulation.cycle_count
            );
            stop(state);
            break;
        }
    }
}

/// Wendet alle wartenden Bearbeitungen an und führt dann einen Zyklus aus.
///
/// Liefert `true`, wenn der Zyklus fehlerfrei lief.
fn run_one_cycle(state: &mut AppState) -> bool {
    flush_pending(state);
    let report = scan::run_cycle(&mut state.program, state.options.ticks_per_cycle);
    state.simulation.cycle_count += 1;
    let clean = report.is_clean();
    state.simulation.last_report = Some(report);
    clean
}

/// Wendet zurückgestellte Bearbeitungen in Eingangsreihenfolge an.
///
/// Ein inzwischen ungültiger Befehl wird verworfen, die übrigen laufen weiter.
fn flush_pending(state: &mut AppState) {
    for pending in state.simulation.take_pending() {
        let result = match &pending {
            PendingEdit::Edit(command) => editing::commit_edit(state, command),
            PendingEdit::Undo => editing::undo_now(state),
            PendingEdit::Redo => editing::redo_now(state),
        };
        if let Err(err) = result {
            log::warn!("Zurückgestellte Bearbeitung {:?} verworfen: {}", pending, err);
        }
    }
}
