//! Variablen (benannte Speicherzellen) und ihre Werte.

use super::device::{DeviceKind, DeviceRef};
use super::element::ElementId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Wert einer Variable: Bit für X/Y/M, Wort für alle Register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    /// Bit-Wert
    Bool(bool),
    /// Wort-Wert (vorzeichenbehaftet, 32 Bit)
    Int(i32),
}

impl VarValue {
    /// Startwert für eine Geräteart (`false` bzw. `0`).
    pub fn default_for(kind: DeviceKind) -> Self {
        if kind.is_discrete() {
            Self::Bool(false)
        } else {
            Self::Int(0)
        }
    }

    /// Prüft, ob der Werttyp zur Geräteart passt.
    pub fn matches_kind(self, kind: DeviceKind) -> bool {
        matches!(self, Self::Bool(_)) == kind.is_discrete()
    }

    /// Bit-Sicht auf den Wert (Wort ≠ 0 gilt als `true`).
    pub fn as_bool(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Int(v) => v != 0,
        }
    }

    /// Wort-Sicht auf den Wert (`true` = 1).
    pub fn as_int(self) -> i32 {
        match self {
            Self::Bool(b) => i32::from(b),
            Self::Int(v) => v,
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "ON"),
            Self::Bool(false) => write!(f, "OFF"),
            Self::Int(v) => write!(f, "{v}"),
        }
    }
}

/// Eine Variable des Programms.
///
/// `used_by` ist ein abgeleiteter Rückverweis-Index (welche Elemente die
/// Variable referenzieren) und wird nicht persistiert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Geräte-Adresse
    pub name: DeviceRef,
    /// Aktueller Wert
    pub value: VarValue,
    /// Referenzierende Element-IDs
    #[serde(skip)]
    pub used_by: BTreeSet<ElementId>,
}

impl Variable {
    /// Erstellt eine unreferenzierte Variable mit Startwert.
    pub fn new(name: DeviceRef) -> Self {
        Self {
            name,
            value: VarValue::default_for(name.kind),
            used_by: BTreeSet::new(),
        }
    }

    /// Geräteart der Variable.
    pub fn kind(&self) -> DeviceKind {
        self.name.kind
    }

    /// Vom Anwender forcierbar (nicht T/C).
    pub fn is_forceable(&self) -> bool {
        !self.kind().is_read_only()
    }
}
