//! Use-Case-Funktionen für Dateiaktionen.
//! Alle Dateisystem-Operationen (I/O) sind hier zentralisiert.

use crate::app::AppState;
use crate::persist::{self, PersistedProject};
use std::path::PathBuf;

/// Lädt ein Projekt und ersetzt Programm, History und Symbol-Einstellungen.
pub fn load_project(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    let project = persist::load_project_file(&path)?;

    state.replace_program(project.program);
    state.symbol_entry.apply_prefs(&project.symbol_entry);
    state.project_path = Some(path);
    state.dirty = false;
    Ok(())
}

/// Speichert das Projekt.
///
/// `None` speichert unter dem aktuell bekannten Pfad.
/// `Some(p)` speichert explizit unter dem neuen Pfad `p`.
pub fn save_project(state: &mut AppState, path: Option<PathBuf>) -> anyhow::Result<()> {
    let Some(path) = path.or_else(|| state.project_path.clone()) else {
        anyhow::bail!("Kein Speicherpfad bekannt");
    };

    let project = PersistedProject::new(state.program.clone(), state.symbol_entry.prefs());
    persist::save_project_file(&path, &project)?;

    state.project_path = Some(path);
    state.dirty = false;
    Ok(())
}
