//! Use-Case-Funktionen auf Programmebene: Vorlagen, Prüfung, Optionen.

use crate::app::events::ProgramTemplate;
use crate::app::AppState;
use crate::core::{check_program, LadderProgram};
use crate::shared::SimulatorOptions;

/// Lädt eine Vorlage. Die History wird dabei geleert.
pub fn load_template(state: &mut AppState, template: ProgramTemplate) {
    let program = match template {
        ProgramTemplate::Empty => LadderProgram::new(),
        ProgramTemplate::Sample => LadderProgram::sample(),
    };
    log::info!(
        "Vorlage {:?} geladen: {} Strompfade, {} Elemente",
        template,
        program.rung_count(),
        program.element_count()
    );
    state.replace_program(program);
    state.project_path = None;
    state.dirty = false;
}

/// Führt die Strukturprüfung aus und legt die Befunde im State ab.
pub fn check(state: &mut AppState) {
    state.diagnostics = check_program(&state.program);
    if state.diagnostics.is_empty() {
        log::info!("Programmprüfung: keine Befunde");
    } else {
        for diagnostic in &state.diagnostics {
            log::warn!("Programmprüfung: {}", diagnostic);
        }
    }
}

/// Übernimmt neue Laufzeit-Optionen.
pub fn apply_options(state: &mut AppState, options: SimulatorOptions) {
    if options.history_depth != state.options.history_depth {
        state.history.set_max_depth(options.history_depth);
    }
    state.options = options;
    log::info!("Optionen übernommen");
}
