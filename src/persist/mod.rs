//! Persistierter Projektzustand: Schaltungsmodell und Symbol-Eingabe-Einstellungen.
//!
//! Das JSON trägt eine Schema-Version. Ältere Stände laufen beim Laden durch
//! die geordneten Migrationen in [`migrations`], bevor sie deserialisiert werden.

pub mod migrations;

use crate::app::state::SymbolEntryPrefs;
use crate::core::{BranchId, ElementId, LadderProgram, RungId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Aktuelle Schema-Version.
pub const CURRENT_VERSION: u64 = 3;

/// Fehler beim Laden oder Speichern eines Projekts.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Datei nicht les-/schreibbar
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Kein gültiges JSON bzw. passt nicht zum Schema
    #[error("invalid project data: {0}")]
    Json(#[from] serde_json::Error),
    /// Feld `version` fehlt
    #[error("project has no schema version")]
    MissingVersion,
    /// Version unbekannt (zu neu oder ungültig)
    #[error("unsupported schema version {found} (supported 1..={current})")]
    UnsupportedVersion {
        /// Gefundene Version
        found: u64,
        /// Aktuelle Version
        current: u64,
    },
    /// Migrationsschritt fehlgeschlagen
    #[error("migration from version {from} failed: {reason}")]
    Migration {
        /// Ausgangsversion des Schritts
        from: u64,
        /// Ursache
        reason: String,
    },
    /// Programm ist strukturell inkonsistent
    #[error("inconsistent program: {0}")]
    Inconsistent(String),
}

/// Projektdatei im aktuellen Schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedProject {
    /// Schema-Version
    pub version: u64,
    /// Schaltungsmodell
    pub program: LadderProgram,
    /// Einstellungen der Symbol-Eingabe
    #[serde(default)]
    pub symbol_entry: SymbolEntryPrefs,
}

impl PersistedProject {
    /// Erstellt ein Projekt im aktuellen Schema.
    pub fn new(program: LadderProgram, symbol_entry: SymbolEntryPrefs) -> Self {
        Self {
            version: CURRENT_VERSION,
            program,
            symbol_entry,
        }
    }
}

/// Serialisiert ein Projekt als JSON.
pub fn to_json_string(project: &PersistedProject) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Lädt ein Projekt aus JSON, migriert es und baut die Rückverweise auf.
pub fn from_json_str(text: &str) -> Result<PersistedProject, PersistError> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    let migrated = migrations::migrate(raw)?;
    let mut project: PersistedProject = serde_json::from_value(migrated)?;
    validate_program(&project.program)?;
    project.program.rebuild_used_by();
    Ok(project)
}

/// Lädt ein Projekt aus einer Datei.
pub fn load_project_file(path: &Path) -> Result<PersistedProject, PersistError> {
    let text = std::fs::read_to_string(path)?;
    let project = from_json_str(&text)?;
    log::info!(
        "Projekt geladen aus {}: {} Strompfade, {} Elemente, {} Variablen",
        path.display(),
        project.program.rung_count(),
        project.program.element_count(),
        project.program.variable_count()
    );
    Ok(project)
}

/// Speichert ein Projekt in eine Datei.
pub fn save_project_file(path: &Path, project: &PersistedProject) -> Result<(), PersistError> {
    let text = to_json_string(project)?;
    std::fs::write(path, text)?;
    log::info!("Projekt gespeichert nach: {}", path.display());
    Ok(())
}

/// Prüft, was der Scan-Zyklus voraussetzt: eindeutige IDs, Verzweigungen
/// innerhalb der Breite ohne Teilüberlappung, Operanden passend zur
/// Elementart, Positionen passend zum Pfad und Werte passend zur Geräteart.
fn validate_program(program: &LadderProgram) -> Result<(), PersistError> {
    let mut rung_ids: BTreeSet<RungId> = BTreeSet::new();
    let mut branch_ids: BTreeSet<BranchId> = BTreeSet::new();
    let mut ids: BTreeSet<ElementId> = BTreeSet::new();
    for rung in &program.rungs {
        if !rung_ids.insert(rung.id) {
            return Err(inconsistent(format!("duplicate rung id {}", rung.id)));
        }
        for (index, branch) in rung.branches.iter().enumerate() {
            if !branch_ids.insert(branch.id) {
                return Err(inconsistent(format!("duplicate branch id {}", branch.id)));
            }
            if branch.start_column >= branch.end_column || branch.end_column > rung.width {
                return Err(inconsistent(format!(
                    "branch {} spans {}..{} outside rung {} (width {})",
                    branch.id, branch.start_column, branch.end_column, rung.id, rung.width
                )));
            }
            if let Some(other) = rung.branches[..index]
                .iter()
                .find(|other| other.conflicts_with(branch.start_column, branch.end_column))
            {
                return Err(inconsistent(format!(
                    "branches {} and {} partially overlap in rung {}",
                    other.id, branch.id, rung.id
                )));
            }
        }

        let main = rung.elements.iter().map(|e| (e, None, 0..rung.width));
        let branched = rung.branches.iter().flat_map(|b| {
            b.elements
                .iter()
                .map(move |e| (e, Some(b.id), b.start_column..b.end_column))
        });
        for (element, branch, columns) in main.chain(branched) {
            if !ids.insert(element.id) {
                return Err(inconsistent(format!("duplicate element id {}", element.id)));
            }
            let spec = element.kind.spec();
            if element.operands.len() != spec.arity() {
                return Err(inconsistent(format!(
                    "element {} ({}) has {} operands, expected {}",
                    element.id,
                    spec.mnemonic,
                    element.operands.len(),
                    spec.arity()
                )));
            }
            if element.position.rung != rung.id {
                return Err(inconsistent(format!(
                    "element {} claims rung {} but lives in rung {}",
                    element.id, element.position.rung, rung.id
                )));
            }
            if element.position.branch != branch {
                return Err(inconsistent(format!(
                    "element {} claims branch {:?} but lives in {:?}",
                    element.id, element.position.branch, branch
                )));
            }
            if !columns.contains(&element.position.column) {
                return Err(inconsistent(format!(
                    "element {} at column {} outside {}..{}",
                    element.id, element.position.column, columns.start, columns.end
                )));
            }
        }
    }

    for variable in program.variables.values() {
        if !variable.value.matches_kind(variable.kind()) {
            return Err(inconsistent(format!(
                "variable {} holds {:?}",
                variable.name, variable.value
            )));
        }
    }
    Ok(())
}

fn inconsistent(message: String) -> PersistError {
    PersistError::Inconsistent(message)
}
