//! Handler für Scan-Zyklen und Free-Run.

use crate::app::use_cases;
use crate::app::AppState;

/// Führt einen einzelnen Scan-Zyklus aus.
pub fn step(state: &mut AppState) {
    use_cases::simulation::step(state);
}

/// Startet den Free-Run.
pub fn start(state: &mut AppState) {
    use_cases::simulation::start(state);
}

/// Stoppt den Free-Run.
pub fn stop(state: &mut AppState) {
    use_cases::simulation::stop(state);
}

/// Verarbeitet einen Host-Tick.
pub fn advance(state: &mut AppState, elapsed_ms: u64) {
    use_cases::simulation::advance(state, elapsed_ms);
}
