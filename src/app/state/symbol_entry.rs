//! Zustand der Symbol-Eingabe (Gerät für Kontakt/Spule eintippen).

use crate::core::{validate_device_text, DeviceError, DeviceRef};
use serde::{Deserialize, Serialize};

/// Anweisung, die die Symbol-Eingabe erzeugt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolInstruction {
    /// Schließer-Kontakt
    #[default]
    Contact,
    /// Ausgangsspule
    Coil,
}

/// Commit-Event der Symbol-Eingabe: `{ instruction, device }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCommit {
    /// Anweisung
    pub instruction: SymbolInstruction,
    /// Normalisierter Geräte-Text
    pub device: String,
}

/// Dauerhafte Einstellungen der Symbol-Eingabe (werden im Projekt gespeichert).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntryPrefs {
    /// Zuletzt gewählte Anweisung
    #[serde(default)]
    pub instruction: SymbolInstruction,
    /// Nach dem Übernehmen offen bleiben
    #[serde(default)]
    pub enter_symbol_continuously: bool,
    /// Geräte-Text nach dem Übernehmen stehen lassen
    #[serde(default)]
    pub enter_device_comment_continuously: bool,
}

/// Transienter Zustand der Symbol-Eingabe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolEntryState {
    /// Ob die Eingabe geöffnet ist
    pub is_open: bool,
    /// Gewählte Anweisung
    pub instruction: SymbolInstruction,
    /// Zuletzt gültiger (normalisierter) Geräte-Text
    pub device_text: String,
    /// Fehler der letzten Eingabe
    pub device_error: Option<DeviceError>,
    /// Nach dem Übernehmen offen bleiben
    pub enter_symbol_continuously: bool,
    /// Geräte-Text nach dem Übernehmen stehen lassen
    pub enter_device_comment_continuously: bool,
}

impl SymbolEntryState {
    /// Erstellt eine geschlossene Eingabe mit Standardwerten.
    pub fn new() -> Self {
        Self::default()
    }

    /// Öffnet die Eingabe mit leerem Text.
    pub fn open(&mut self, instruction: SymbolInstruction) {
        self.is_open = true;
        self.instruction = instruction;
        self.device_text.clear();
        self.device_error = None;
    }

    /// Schließt die Eingabe ohne Commit.
    pub fn close(&mut self) {
        self.is_open = false;
        self.device_error = None;
    }

    /// Übernimmt einen Tastendruck-Stand des Geräte-Texts.
    ///
    /// Gültiger Text wird normalisiert übernommen. Ungültiger Text lässt den
    /// letzten gültigen Text stehen und merkt sich den Fehler.
    pub fn set_device_text(&mut self, text: &str) -> Result<Option<DeviceRef>, DeviceError> {
        match validate_device_text(text) {
            Ok(device) => {
                self.device_text = device.map(|d| d.to_string()).unwrap_or_default();
                self.device_error = None;
                Ok(device)
            }
            Err(err) => {
                self.device_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Erzeugt das Commit-Event, sofern ein Gerät eingegeben und kein Fehler offen ist.
    ///
    /// Danach wird je nach Dauer-Eingabe-Flags der Text geleert bzw. die
    /// Eingabe geschlossen.
    pub fn commit(&mut self) -> Option<SymbolCommit> {
        if !self.is_open || self.device_error.is_some() || self.device_text.is_empty() {
            return None;
        }
        let commit = SymbolCommit {
            instruction: self.instruction,
            device: self.device_text.clone(),
        };
        if !self.enter_device_comment_continuously {
            self.device_text.clear();
        }
        if !self.enter_symbol_continuously {
            self.is_open = false;
        }
        Some(commit)
    }

    /// Persistierbarer Anteil.
    pub fn prefs(&self) -> SymbolEntryPrefs {
        SymbolEntryPrefs {
            instruction: self.instruction,
            enter_symbol_continuously: self.enter_symbol_continuously,
            enter_device_comment_continuously: self.enter_device_comment_continuously,
        }
    }

    /// Übernimmt gespeicherte Einstellungen.
    pub fn apply_prefs(&mut self, prefs: &SymbolEntryPrefs) {
        self.instruction = prefs.instruction;
        self.enter_symbol_continuously = prefs.enter_symbol_continuously;
        self.enter_device_comment_continuously = prefs.enter_device_comment_continuously;
    }
}
