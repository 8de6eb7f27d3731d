//! Geräte-Adressen (Devices) und die Validierung von Geräte-Text.
//!
//! Ein Device ist eine benannte Speicherzelle der SPS, z.B. `X10`, `Y20`,
//! `M0`, `D100`, `T5` oder `C3`. Der Präfix bestimmt die Geräteart, der Rest
//! ist die dezimale Adresse.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Erlaubte Präfixe in Anzeige-Reihenfolge.
pub const DEVICE_PREFIXES: [char; 9] = ['X', 'Y', 'M', 'D', 'T', 'C', 'R', 'Z', 'S'];

/// Maximale Anzahl Ziffern einer Geräte-Adresse.
pub const MAX_ADDRESS_DIGITS: usize = 6;

static ADDRESS_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("statisches Regex-Literal"));

/// Geräteart, abgeleitet aus dem Präfix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// `X`: digitaler Eingang
    DiscreteInput,
    /// `Y`: digitaler Ausgang
    DiscreteOutput,
    /// `M`: interner Merker
    InternalRelay,
    /// `D`: Datenregister
    DataRegister,
    /// `T`: Timer-Istwert
    TimerAccumulator,
    /// `C`: Zähler-Istwert
    CounterAccumulator,
    /// `R`: Sonderregister (File-Register)
    FileRegister,
    /// `Z`: Sonderregister (Index-Register)
    IndexRegister,
    /// `S`: Sonderregister (Schritt-Register)
    StepRegister,
}

impl DeviceKind {
    /// Ordnet einen (bereits großgeschriebenen) Präfix seiner Geräteart zu.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        Some(match prefix {
            'X' => Self::DiscreteInput,
            'Y' => Self::DiscreteOutput,
            'M' => Self::InternalRelay,
            'D' => Self::DataRegister,
            'T' => Self::TimerAccumulator,
            'C' => Self::CounterAccumulator,
            'R' => Self::FileRegister,
            'Z' => Self::IndexRegister,
            'S' => Self::StepRegister,
            _ => return None,
        })
    }

    /// Präfix-Zeichen der Geräteart.
    pub fn prefix(self) -> char {
        match self {
            Self::DiscreteInput => 'X',
            Self::DiscreteOutput => 'Y',
            Self::InternalRelay => 'M',
            Self::DataRegister => 'D',
            Self::TimerAccumulator => 'T',
            Self::CounterAccumulator => 'C',
            Self::FileRegister => 'R',
            Self::IndexRegister => 'Z',
            Self::StepRegister => 'S',
        }
    }

    /// `true` für Bit-Geräte (X, Y, M), `false` für Wort-Register.
    pub fn is_discrete(self) -> bool {
        matches!(
            self,
            Self::DiscreteInput | Self::DiscreteOutput | Self::InternalRelay
        )
    }

    /// Timer-/Zähler-Istwerte werden nur vom Scan-Zyklus geschrieben.
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::TimerAccumulator | Self::CounterAccumulator)
    }
}

/// Normalisierte Geräte-Referenz (Präfix + numerische Adresse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceRef {
    /// Geräteart
    pub kind: DeviceKind,
    /// Dezimale Adresse (max. 6 Ziffern)
    pub address: u32,
}

impl DeviceRef {
    /// Erstellt eine Referenz ohne Textprüfung.
    pub fn new(kind: DeviceKind, address: u32) -> Self {
        Self { kind, address }
    }
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.address)
    }
}

impl From<DeviceRef> for String {
    fn from(device: DeviceRef) -> Self {
        device.to_string()
    }
}

impl TryFrom<String> for DeviceRef {
    type Error = DeviceError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        validate_device_text(&text)?.ok_or(DeviceError::NonDigitSuffix)
    }
}

impl std::str::FromStr for DeviceRef {
    type Err = DeviceError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        validate_device_text(text)?.ok_or(DeviceError::NonDigitSuffix)
    }
}

/// Fehler der Geräte-Text-Validierung.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum DeviceError {
    /// Erstes Zeichen ist kein gültiger Präfix
    #[error("Invalid device prefix. Valid prefixes: {}", format_prefixes(.allowed))]
    InvalidPrefix {
        /// Erlaubte Präfixe (für die Anzeige)
        allowed: Vec<char>,
    },
    /// Adresse fehlt oder enthält Nicht-Ziffern
    #[error("Device number must contain only digits")]
    NonDigitSuffix,
    /// Adresse hat mehr als `max` Ziffern
    #[error("Device number too long (max {max} digits)")]
    SuffixTooLong {
        /// Maximale Ziffernanzahl
        max: usize,
    },
}

fn format_prefixes(allowed: &[char]) -> String {
    allowed
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validiert Geräte-Text, wie er bei jedem Tastendruck eingegeben wird.
///
/// - Leerer Text → `Ok(None)` ("noch kein Device gebunden")
/// - Sonst: Großschreibung, Präfix aus [`DEVICE_PREFIXES`], danach 1–6 Ziffern.
///   Leerzeichen werden nicht entfernt und scheitern am Präfix bzw. den Ziffern.
///
/// Die Funktion ist rein und konsultiert das Programm nicht: ein syntaktisch
/// gültiges Device muss noch nicht als Variable existieren.
pub fn validate_device_text(text: &str) -> Result<Option<DeviceRef>, DeviceError> {
    let normalized = text.to_uppercase();
    let mut chars = normalized.chars();
    let Some(prefix) = chars.next() else {
        return Ok(None);
    };

    let Some(kind) = DeviceKind::from_prefix(prefix) else {
        return Err(DeviceError::InvalidPrefix {
            allowed: DEVICE_PREFIXES.to_vec(),
        });
    };

    let suffix = chars.as_str();
    if !ADDRESS_DIGITS.is_match(suffix) {
        return Err(DeviceError::NonDigitSuffix);
    }
    if suffix.len() > MAX_ADDRESS_DIGITS {
        return Err(DeviceError::SuffixTooLong {
            max: MAX_ADDRESS_DIGITS,
        });
    }

    // Max. 6 Ziffern passen immer in u32
    let address = suffix
        .parse::<u32>()
        .map_err(|_| DeviceError::NonDigitSuffix)?;
    Ok(Some(DeviceRef { kind, address }))
}
