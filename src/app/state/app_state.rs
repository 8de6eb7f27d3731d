use crate::app::history::EditHistory;
use crate::app::CommandLog;
use crate::core::{Diagnostic, LadderProgram, Patch};
use crate::shared::SimulatorOptions;
use std::path::PathBuf;

use super::{SimulationState, SymbolEntryState};

/// Hauptzustand der Anwendung
pub struct AppState {
    /// Aktuelles Ladder-Programm (Schaltungsmodell)
    pub program: LadderProgram,
    /// Undo/Redo-History (Patch-basiert)
    pub history: EditHistory<Patch>,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: SimulatorOptions,
    /// Simulations-State
    pub simulation: SimulationState,
    /// Symbol-Eingabe-State
    pub symbol_entry: SymbolEntryState,
    /// Befunde der letzten Programmprüfung
    pub diagnostics: Vec<Diagnostic>,
    /// Pfad des geladenen/gespeicherten Projekts
    pub project_path: Option<PathBuf>,
    /// Ungespeicherte Änderungen vorhanden
    pub dirty: bool,
}

impl AppState {
    /// Erstellt einen neuen App-State mit leerem Programm
    pub fn new() -> Self {
        Self::with_options(SimulatorOptions::default())
    }

    /// Erstellt einen App-State mit vorgegebenen Optionen
    pub fn with_options(options: SimulatorOptions) -> Self {
        Self {
            program: LadderProgram::new(),
            history: EditHistory::new_with_capacity(options.history_depth),
            command_log: CommandLog::new(),
            options,
            simulation: SimulationState::new(),
            symbol_entry: SymbolEntryState::new(),
            diagnostics: Vec::new(),
            project_path: None,
            dirty: false,
        }
    }

    /// Ersetzt das Programm komplett und verwirft History und Simulationsstand.
    pub fn replace_program(&mut self, program: LadderProgram) {
        self.program = program;
        self.history = EditHistory::new_with_capacity(self.options.history_depth);
        self.simulation.reset();
        self.diagnostics.clear();
    }

    /// Gibt die Anzahl der Strompfade zurück (für Anzeige)
    pub fn rung_count(&self) -> usize {
        self.program.rung_count()
    }

    /// Gibt die Anzahl der Elemente zurück (für Anzeige)
    pub fn element_count(&self) -> usize {
        self.program.element_count()
    }

    /// Undo/Redo helpers
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Gibt zurück, ob ein Redo-Schritt verfügbar ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
