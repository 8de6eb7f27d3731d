//! Statischer Element-Katalog: Elementarten, Pin-Belegung und Verhalten.
//!
//! Jede Elementart hat genau einen Katalogeintrag ([`ElementSpec`]) und genau
//! eine Auswerteregel im Scan-Zyklus (`scan::rules`).

use super::device::DeviceKind;
use serde::{Deserialize, Serialize};

/// Arithmetische Operation eines Rechenbausteins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathOp {
    /// `ADD`
    Add,
    /// `SUB`
    Sub,
    /// `MUL`
    Mul,
    /// `DIV` (Division durch 0 ist ein Scan-Fehler)
    Div,
}

/// Vergleichsoperation eines Vergleichsbausteins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// `EQU`: gleich
    Equ,
    /// `NEQ`: ungleich
    Neq,
    /// `GRT`: größer
    Grt,
    /// `GEQ`: größer gleich
    Geq,
    /// `LES`: kleiner
    Les,
    /// `LEQ`: kleiner gleich
    Leq,
}

impl CompareOp {
    /// Wendet den Vergleich auf zwei Registerwerte an.
    pub fn holds(self, a: i32, b: i32) -> bool {
        match self {
            Self::Equ => a == b,
            Self::Neq => a != b,
            Self::Grt => a > b,
            Self::Geq => a >= b,
            Self::Les => a < b,
            Self::Leq => a <= b,
        }
    }
}

/// Geschlossene Menge aller Kontaktplan-Elementarten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Schließer `—| |—`
    NormallyOpen,
    /// Öffner `—|/|—`
    NormallyClosed,
    /// Flankenkontakt steigend
    OneShotRising,
    /// Flankenkontakt fallend
    OneShotFalling,
    /// Spule `( )`
    OutputEnergize,
    /// Setzende Spule `(L)`
    OutputLatch,
    /// Rücksetzende Spule `(U)`
    OutputUnlatch,
    /// Negierte Spule `(/)`
    OutputNegated,
    /// Einschaltverzögerung
    TimerOnDelay,
    /// Ausschaltverzögerung
    TimerOffDelay,
    /// Speichernder Timer
    RetentiveTimer,
    /// Vorwärtszähler
    CountUp,
    /// Rückwärtszähler
    CountDown,
    /// Vor-/Rückwärtszähler
    CountUpDown,
    /// Rechenbaustein
    Math(MathOp),
    /// Vergleichsbaustein
    Compare(CompareOp),
    /// Transferbaustein `MOV`
    Move,
    /// Rücksetzbefehl für Timer/Zähler (`RES`)
    Reset,
}

/// Rolle eines Operanden-Pins; bestimmt, welche Devices gebunden werden dürfen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    /// Gelesenes Bit (X, Y, M)
    BitIn,
    /// Geschriebenes Bit (Y, M)
    BitOut,
    /// Gelesenes Wort (Register oder Konstante)
    WordIn,
    /// Geschriebenes Wort (D, R, Z, S)
    WordOut,
    /// Timer-Istwert (T)
    TimerAccumulator,
    /// Zähler-Istwert (C)
    CounterAccumulator,
    /// Ziel eines Rücksetzbefehls (T oder C)
    ResetTarget,
}

impl PinRole {
    /// Prüft, ob ein Device dieser Art an den Pin gebunden werden darf.
    pub fn accepts_device(self, kind: DeviceKind) -> bool {
        match self {
            Self::BitIn => kind.is_discrete(),
            Self::BitOut => kind.is_discrete() && kind != DeviceKind::DiscreteInput,
            Self::WordIn => !kind.is_discrete(),
            Self::WordOut => !kind.is_discrete() && !kind.is_read_only(),
            Self::TimerAccumulator => kind == DeviceKind::TimerAccumulator,
            Self::CounterAccumulator => kind == DeviceKind::CounterAccumulator,
            Self::ResetTarget => kind.is_read_only(),
        }
    }

    /// Nur gelesene Wort-Pins akzeptieren Konstanten (`K<n>`).
    pub fn accepts_constant(self) -> bool {
        self == Self::WordIn
    }
}

/// Benannter Pin eines Elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSpec {
    /// Anzeigename des Pins
    pub name: &'static str,
    /// Rolle des Pins
    pub role: PinRole,
}

/// Eingangs- oder Ausgangsanweisung.
///
/// Eingangsanweisungen verknüpfen den Stromfluss, Ausgangsanweisungen reichen
/// ihn durch und bilden die Ausgangsstufe eines Strompfads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementClass {
    /// Kontakte, Flanken, Vergleiche
    Input,
    /// Spulen, Timer, Zähler, Rechen- und Transferbausteine
    Output,
}

/// Katalogeintrag einer Elementart.
#[derive(Debug, Clone, Copy)]
pub struct ElementSpec {
    /// Kurzbezeichnung (wie im Kontaktplan angezeigt)
    pub mnemonic: &'static str,
    /// Operanden-Pins in Reihenfolge
    pub pins: &'static [PinSpec],
    /// Eingangs-/Ausgangsanweisung
    pub class: ElementClass,
    /// Zustand bleibt über Zyklen erhalten (Timer, Zähler, Flanken)
    pub stateful: bool,
}

impl ElementSpec {
    /// Anzahl der Operanden.
    pub fn arity(&self) -> usize {
        self.pins.len()
    }
}

const fn pin(name: &'static str, role: PinRole) -> PinSpec {
    PinSpec { name, role }
}

const CONTACT_PINS: &[PinSpec] = &[pin("device", PinRole::BitIn)];
const COIL_PINS: &[PinSpec] = &[pin("device", PinRole::BitOut)];
const TIMER_PINS: &[PinSpec] = &[
    pin("preset", PinRole::WordIn),
    pin("accumulator", PinRole::TimerAccumulator),
    pin("done", PinRole::BitOut),
];
const COUNTER_PINS: &[PinSpec] = &[
    pin("preset", PinRole::WordIn),
    pin("accumulator", PinRole::CounterAccumulator),
    pin("done", PinRole::BitOut),
];
const UP_DOWN_COUNTER_PINS: &[PinSpec] = &[
    pin("preset", PinRole::WordIn),
    pin("accumulator", PinRole::CounterAccumulator),
    pin("done", PinRole::BitOut),
    pin("down", PinRole::BitIn),
];
const COMPARE_PINS: &[PinSpec] = &[
    pin("a", PinRole::WordIn),
    pin("b", PinRole::WordIn),
    pin("q", PinRole::BitOut),
];
const MATH_PINS: &[PinSpec] = &[
    pin("a", PinRole::WordIn),
    pin("b", PinRole::WordIn),
    pin("destination", PinRole::WordOut),
];
const MOVE_PINS: &[PinSpec] = &[
    pin("source", PinRole::WordIn),
    pin("destination", PinRole::WordOut),
];
const RESET_PINS: &[PinSpec] = &[pin("target", PinRole::ResetTarget)];

const fn input(mnemonic: &'static str, pins: &'static [PinSpec], stateful: bool) -> ElementSpec {
    ElementSpec {
        mnemonic,
        pins,
        class: ElementClass::Input,
        stateful,
    }
}

const fn output(mnemonic: &'static str, pins: &'static [PinSpec], stateful: bool) -> ElementSpec {
    ElementSpec {
        mnemonic,
        pins,
        class: ElementClass::Output,
        stateful,
    }
}

impl ElementKind {
    /// Alle Elementarten (z.B. für eine Werkzeugpalette).
    pub const ALL: [ElementKind; 26] = [
        Self::NormallyOpen,
        Self::NormallyClosed,
        Self::OneShotRising,
        Self::OneShotFalling,
        Self::OutputEnergize,
        Self::OutputLatch,
        Self::OutputUnlatch,
        Self::OutputNegated,
        Self::TimerOnDelay,
        Self::TimerOffDelay,
        Self::RetentiveTimer,
        Self::CountUp,
        Self::CountDown,
        Self::CountUpDown,
        Self::Math(MathOp::Add),
        Self::Math(MathOp::Sub),
        Self::Math(MathOp::Mul),
        Self::Math(MathOp::Div),
        Self::Compare(CompareOp::Equ),
        Self::Compare(CompareOp::Neq),
        Self::Compare(CompareOp::Grt),
        Self::Compare(CompareOp::Geq),
        Self::Compare(CompareOp::Les),
        Self::Compare(CompareOp::Leq),
        Self::Move,
        Self::Reset,
    ];

    /// Liefert den Katalogeintrag dieser Elementart.
    pub fn spec(self) -> ElementSpec {
        match self {
            Self::NormallyOpen => input("LD", CONTACT_PINS, false),
            Self::NormallyClosed => input("LDI", CONTACT_PINS, false),
            Self::OneShotRising => input("LDP", CONTACT_PINS, true),
            Self::OneShotFalling => input("LDF", CONTACT_PINS, true),
            Self::OutputEnergize => output("OUT", COIL_PINS, false),
            Self::OutputLatch => output("SET", COIL_PINS, false),
            Self::OutputUnlatch => output("RST", COIL_PINS, false),
            Self::OutputNegated => output("OUTN", COIL_PINS, false),
            Self::TimerOnDelay => output("TON", TIMER_PINS, true),
            Self::TimerOffDelay => output("TOF", TIMER_PINS, true),
            Self::RetentiveTimer => output("RTO", TIMER_PINS, true),
            Self::CountUp => output("CTU", COUNTER_PINS, true),
            Self::CountDown => output("CTD", COUNTER_PINS, true),
            Self::CountUpDown => output("CTUD", UP_DOWN_COUNTER_PINS, true),
            Self::Math(MathOp::Add) => output("ADD", MATH_PINS, false),
            Self::Math(MathOp::Sub) => output("SUB", MATH_PINS, false),
            Self::Math(MathOp::Mul) => output("MUL", MATH_PINS, false),
            Self::Math(MathOp::Div) => output("DIV", MATH_PINS, false),
            Self::Compare(CompareOp::Equ) => input("EQU", COMPARE_PINS, false),
            Self::Compare(CompareOp::Neq) => input("NEQ", COMPARE_PINS, false),
            Self::Compare(CompareOp::Grt) => input("GRT", COMPARE_PINS, false),
            Self::Compare(CompareOp::Geq) => input("GEQ", COMPARE_PINS, false),
            Self::Compare(CompareOp::Les) => input("LES", COMPARE_PINS, false),
            Self::Compare(CompareOp::Leq) => input("LEQ", COMPARE_PINS, false),
            Self::Move => output("MOV", MOVE_PINS, false),
            Self::Reset => output("RES", RESET_PINS, false),
        }
    }

    /// `true` für Spulen (OUT, SET, RST, OUTN).
    pub fn is_coil(self) -> bool {
        matches!(
            self,
            Self::OutputEnergize | Self::OutputLatch | Self::OutputUnlatch | Self::OutputNegated
        )
    }

    /// `true` für Timer aller Arten.
    pub fn is_timer(self) -> bool {
        matches!(
            self,
            Self::TimerOnDelay | Self::TimerOffDelay | Self::RetentiveTimer
        )
    }

    /// `true` für Zähler aller Arten.
    pub fn is_counter(self) -> bool {
        matches!(self, Self::CountUp | Self::CountDown | Self::CountUpDown)
    }

    /// Kurzform für `spec().class == Output`.
    pub fn is_output(self) -> bool {
        self.spec().class == ElementClass::Output
    }
}
