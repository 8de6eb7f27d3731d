use super::super::state::{SymbolCommit, SymbolInstruction};
use crate::core::{BranchId, ElementId, ElementKind, RungId, VarValue};
use crate::shared::SimulatorOptions;
use std::path::PathBuf;

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus UI/Host ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Leeres Programm laden
    NewProgramRequested,
    /// Beispielprogramm laden
    SampleProgramRequested,
    /// Projektdatei öffnen
    OpenProjectRequested { path: PathBuf },
    /// Unter aktuellem Pfad speichern
    SaveRequested,
    /// Unter neuem Pfad speichern
    SaveAsRequested { path: PathBuf },
    /// Optionen wurden geändert
    OptionsChanged { options: SimulatorOptions },

    /// Strompfad einfügen (`None` = anhängen)
    AddRungRequested { index: Option<usize> },
    /// Strompfad löschen
    DeleteRungRequested { rung: RungId },
    /// Strompfad eine Position nach oben
    MoveRungUpRequested { rung: RungId },
    /// Strompfad eine Position nach unten
    MoveRungDownRequested { rung: RungId },
    /// Parallele Verzweigung einfügen
    AddBranchRequested {
        rung: RungId,
        start_column: u16,
        end_column: u16,
    },
    /// Verzweigung löschen
    DeleteBranchRequested { rung: RungId, branch: BranchId },

    /// Element in freien Platz einfügen
    AddElementRequested {
        rung: RungId,
        column: u16,
        branch: Option<BranchId>,
        kind: ElementKind,
        operands: Vec<String>,
    },
    /// Element per Drag&Drop abgelegt
    ElementDropped {
        rung: RungId,
        column: u16,
        branch: Option<BranchId>,
        kind: ElementKind,
        operands: Vec<String>,
    },
    /// Element löschen
    DeleteElementRequested { element: ElementId },
    /// Element eine Spalte nach links
    MoveElementLeftRequested { element: ElementId },
    /// Element eine Spalte nach rechts
    MoveElementRightRequested { element: ElementId },
    /// Operand eines Pins zuweisen
    AssignParameterRequested {
        element: ElementId,
        pin: usize,
        text: String,
    },

    /// Variable deklarieren
    AddVariableRequested { device: String },
    /// Variable löschen
    DeleteVariableRequested { device: String },
    /// Variable umbenennen
    RenameVariableRequested { from: String, to: String },
    /// Variablenwert forcen
    SetVariableValueRequested { device: String, value: VarValue },

    /// Undo
    UndoRequested,
    /// Redo
    RedoRequested,

    /// Einen Scan-Zyklus ausführen
    CycleScanRequested,
    /// Free-Run starten
    StartSimulationRequested,
    /// Free-Run stoppen
    StopSimulationRequested,
    /// Host-Takt (Free-Run)
    HostTick { elapsed_ms: u64 },
    /// Programm prüfen
    CheckProgramRequested,

    /// Symbol-Eingabe öffnen
    SymbolEntryOpened { instruction: SymbolInstruction },
    /// Geräte-Text der Symbol-Eingabe geändert (pro Tastendruck)
    SymbolDeviceTextChanged { text: String },
    /// Anweisung der Symbol-Eingabe gewechselt
    SymbolInstructionChanged { instruction: SymbolInstruction },
    /// "Symbol fortlaufend eingeben" umgeschaltet
    SymbolContinuousToggled { enabled: bool },
    /// "Gerätekommentar fortlaufend eingeben" umgeschaltet
    DeviceCommentContinuousToggled { enabled: bool },
    /// Symbol-Eingabe abgebrochen
    SymbolEntryClosed,
    /// Symbol-Eingabe mit OK bestätigt
    SymbolEntryConfirmed { rung: RungId },
    /// Commit-Event eines externen Symbol-Dialogs
    SymbolCommitted { rung: RungId, commit: SymbolCommit },
}
