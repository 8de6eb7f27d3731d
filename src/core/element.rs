//! Kontaktplan-Elemente: Operanden, Position und interner Zustand.

use super::catalog::ElementKind;
use super::device::{validate_device_text, DeviceError, DeviceRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Eindeutige Element-ID.
pub type ElementId = u64;
/// Eindeutige Strompfad-ID.
pub type RungId = u64;
/// Eindeutige Verzweigungs-ID.
pub type BranchId = u64;

/// Ein gebundener Operand: Device-Referenz oder Dezimalkonstante (`K<n>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    /// Referenz auf eine Variable
    Device(DeviceRef),
    /// Konstante (nur an lesenden Wort-Pins)
    Constant(i32),
}

impl Operand {
    /// Parst Operanden-Text.
    ///
    /// `K<n>` (optional mit Vorzeichen) ist eine Konstante, alles andere läuft
    /// durch [`validate_device_text`]. Leerer Text liefert `Ok(None)`.
    pub fn parse(text: &str) -> Result<Option<Self>, DeviceError> {
        if let Some(digits) = text
            .strip_prefix('K')
            .or_else(|| text.strip_prefix('k'))
        {
            return digits
                .parse::<i32>()
                .map(|k| Some(Self::Constant(k)))
                .map_err(|_| DeviceError::NonDigitSuffix);
        }
        Ok(validate_device_text(text)?.map(Self::Device))
    }

    /// Device-Referenz, falls der Operand keine Konstante ist.
    pub fn device(self) -> Option<DeviceRef> {
        match self {
            Self::Device(dev) => Some(dev),
            Self::Constant(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(dev) => write!(f, "{dev}"),
            Self::Constant(k) => write!(f, "K{k}"),
        }
    }
}

/// Position eines Elements im Strompfad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Besitzender Strompfad
    pub rung: RungId,
    /// Spalte (0 = direkt an der linken Schiene)
    pub column: u16,
    /// Verzweigung (`None` = Hauptpfad)
    pub branch: Option<BranchId>,
}

/// Interner Zustand zustandsbehafteter Elemente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElementState {
    /// Kombinatorisches Element
    #[default]
    None,
    /// Flankenkontakt: zuletzt abgetasteter Variablenwert
    Edge {
        /// Wert aus dem vorherigen Zyklus
        previous: bool,
    },
    /// Timer
    Timer {
        /// Aufgelaufene Zeit in Ticks
        accumulator: i32,
        /// Ausgangsbit
        done: bool,
    },
    /// Zähler
    Counter {
        /// Zählerstand
        count: i32,
        /// Ausgangsbit
        done: bool,
        /// Zählfreigabe im vorherigen Zyklus (Flankenerkennung)
        previous_input: bool,
        /// Rückwärts-Eingang im vorherigen Zyklus (nur CTUD)
        previous_down: bool,
        /// Sollwert geladen (nur CTD)
        loaded: bool,
    },
}

impl ElementState {
    /// Startzustand für eine Elementart.
    pub fn initial_for(kind: ElementKind) -> Self {
        if kind.is_timer() {
            Self::Timer {
                accumulator: 0,
                done: false,
            }
        } else if kind.is_counter() {
            Self::Counter {
                count: 0,
                done: false,
                previous_input: false,
                previous_down: false,
                loaded: false,
            }
        } else if matches!(kind, ElementKind::OneShotRising | ElementKind::OneShotFalling) {
            Self::Edge { previous: false }
        } else {
            Self::None
        }
    }
}

/// Ein Kontaktplan-Element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Eindeutige ID
    pub id: ElementId,
    /// Elementart
    pub kind: ElementKind,
    /// Operanden in Pin-Reihenfolge des Katalogs
    pub operands: Vec<Operand>,
    /// Position im Strompfad
    pub position: Position,
    /// Zustand über Zyklen hinweg
    #[serde(default)]
    pub state: ElementState,
}

impl Element {
    /// Erstellt ein Element im Startzustand.
    pub fn new(id: ElementId, kind: ElementKind, operands: Vec<Operand>, position: Position) -> Self {
        Self {
            id,
            kind,
            operands,
            position,
            state: ElementState::initial_for(kind),
        }
    }

    /// Alle referenzierten Devices (ohne Konstanten, Duplikate möglich).
    pub fn devices(&self) -> impl Iterator<Item = DeviceRef> + '_ {
        self.operands.iter().filter_map(|op| op.device())
    }

    /// Prüft, ob das Element ein Device referenziert.
    pub fn references(&self, device: DeviceRef) -> bool {
        self.devices().any(|d| d == device)
    }

    /// Operand an Pin-Index.
    pub fn operand(&self, pin: usize) -> Option<Operand> {
        self.operands.get(pin).copied()
    }

    /// Setzt den internen Zustand zurück (Timer/Zähler-Reset).
    pub fn reset_state(&mut self) {
        self.state = ElementState::initial_for(self.kind);
    }
}
