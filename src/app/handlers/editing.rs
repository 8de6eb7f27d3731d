//! Handler für Programmbearbeitung, Vorlagen und Prüfung.

use crate::app::events::ProgramTemplate;
use crate::app::use_cases;
use crate::app::AppState;
use crate::core::EditCommand;
use crate::shared::SimulatorOptions;

/// Plant und wendet einen Bearbeitungsbefehl an.
pub fn apply(state: &mut AppState, command: EditCommand) -> anyhow::Result<()> {
    use_cases::editing::apply_edit(state, command)
}

/// Lädt eine Programmvorlage.
pub fn load_template(state: &mut AppState, template: ProgramTemplate) {
    use_cases::simulation::stop(state);
    use_cases::program::load_template(state, template);
}

/// Führt die Strukturprüfung aus.
pub fn check(state: &mut AppState) {
    use_cases::program::check(state);
}

/// Übernimmt geänderte Optionen.
pub fn apply_options(state: &mut AppState, options: SimulatorOptions) {
    use_cases::program::apply_options(state, options);
}
