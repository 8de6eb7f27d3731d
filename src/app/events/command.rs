use super::super::state::{SymbolCommit, SymbolInstruction};
use crate::core::{EditCommand, RungId};
use crate::shared::SimulatorOptions;
use std::path::PathBuf;

/// Programmvorlage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramTemplate {
    /// Leeres Programm
    Empty,
    /// Selbsthaltung mit Timer und Zähler
    Sample,
}

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Vorlage laden (leert die History)
    LoadTemplate { template: ProgramTemplate },
    /// Projekt aus Datei laden
    LoadProject { path: PathBuf },
    /// Projekt speichern (`None` = aktueller Pfad)
    SaveProject { path: Option<PathBuf> },
    /// Optionen übernehmen
    ApplyOptions { options: SimulatorOptions },

    /// Bearbeitung planen und über die History anwenden
    ApplyEdit { command: EditCommand },
    /// Undo-Schritt
    Undo,
    /// Redo-Schritt
    Redo,

    /// Genau einen Scan-Zyklus ausführen
    RunScanCycle,
    /// Free-Run starten
    StartFreeRun,
    /// Free-Run stoppen
    StopFreeRun,
    /// Free-Run um Host-Zeit voranbringen
    AdvanceFreeRun { elapsed_ms: u64 },
    /// Strukturprüfung ausführen
    CheckProgram,

    /// Symbol-Eingabe öffnen
    OpenSymbolEntry { instruction: SymbolInstruction },
    /// Geräte-Text validieren und übernehmen
    SetSymbolDeviceText { text: String },
    /// Anweisung der Symbol-Eingabe setzen
    SetSymbolInstruction { instruction: SymbolInstruction },
    /// Dauer-Eingabe für Symbole setzen
    SetSymbolContinuous { enabled: bool },
    /// Dauer-Eingabe für Gerätekommentare setzen
    SetDeviceCommentContinuous { enabled: bool },
    /// Symbol-Eingabe schließen
    CloseSymbolEntry,
    /// Symbol-Eingabe übernehmen und platzieren
    CommitSymbolEntry { rung: RungId },
    /// Commit-Event in den Strompfad einfügen
    PlaceSymbol { rung: RungId, commit: SymbolCommit },
}
