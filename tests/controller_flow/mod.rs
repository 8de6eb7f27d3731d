mod editing;
mod simulation;
mod symbol_entry;

use plc_ladder_sim::{AppController, AppIntent, AppState};

/// State mit geladenem Beispielprogramm.
pub fn sample_state(controller: &mut AppController) -> AppState {
    let mut state = AppState::new();
    controller
        .handle_intent(&mut state, AppIntent::SampleProgramRequested)
        .expect("Beispielprogramm laden");
    state
}

/// Führt einen Intent aus, der gelingen muss.
pub fn run(controller: &mut AppController, state: &mut AppState, intent: AppIntent) {
    let label = format!("{intent:?}");
    controller
        .handle_intent(state, intent)
        .unwrap_or_else(|e| panic!("{label} fehlgeschlagen: {e}"));
}
