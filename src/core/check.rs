//! Strukturprüfung eines Programms (Syntax-/Logik-Check).

use super::catalog::ElementKind;
use super::device::DeviceRef;
use super::element::{ElementId, RungId};
use super::program::LadderProgram;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Art eines Prüfbefunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// Strompfad mit Elementen, aber ohne Ausgangsanweisung
    MissingOutput,
    /// Strompfad ohne Elemente
    EmptyRung,
    /// Operand referenziert eine nicht deklarierte Variable
    UndeclaredVariable(DeviceRef),
    /// Dieselbe Variable wird von mehreren OUT/OUTN-Spulen geschrieben
    DoubleCoil {
        /// Variable
        device: DeviceRef,
        /// Anzahl Spulen
        count: usize,
    },
}

/// Ein Prüfbefund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Betroffener Strompfad
    pub rung: Option<RungId>,
    /// Betroffenes Element
    pub element: Option<ElementId>,
    /// Befund
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rung) = self.rung {
            write!(f, "rung {rung}: ")?;
        }
        match &self.kind {
            DiagnosticKind::MissingOutput => write!(f, "no output instruction"),
            DiagnosticKind::EmptyRung => write!(f, "empty rung"),
            DiagnosticKind::UndeclaredVariable(device) => {
                write!(f, "undeclared variable {device}")
            }
            DiagnosticKind::DoubleCoil { device, count } => {
                write!(f, "{device} driven by {count} coils")
            }
        }
    }
}

/// Prüft das Programm und liefert alle Befunde in Scan-Reihenfolge.
pub fn check_program(program: &LadderProgram) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut coils: BTreeMap<DeviceRef, Vec<(RungId, ElementId)>> = BTreeMap::new();

    for rung in &program.rungs {
        if rung.all_elements().next().is_none() {
            diagnostics.push(Diagnostic {
                rung: Some(rung.id),
                element: None,
                kind: DiagnosticKind::EmptyRung,
            });
            continue;
        }
        if !rung.has_output() {
            diagnostics.push(Diagnostic {
                rung: Some(rung.id),
                element: None,
                kind: DiagnosticKind::MissingOutput,
            });
        }
        for element in rung.all_elements() {
            for device in element.devices() {
                if program.variable(device).is_none() {
                    diagnostics.push(Diagnostic {
                        rung: Some(rung.id),
                        element: Some(element.id),
                        kind: DiagnosticKind::UndeclaredVariable(device),
                    });
                }
            }
            // SET/RST dürfen mehrfach auf dasselbe Bit wirken
            if matches!(
                element.kind,
                ElementKind::OutputEnergize | ElementKind::OutputNegated
            ) {
                if let Some(device) = element.devices().next() {
                    coils.entry(device).or_default().push((rung.id, element.id));
                }
            }
        }
    }

    for (device, writers) in coils {
        if writers.len() > 1 {
            let (rung, element) = writers[1];
            diagnostics.push(Diagnostic {
                rung: Some(rung),
                element: Some(element),
                kind: DiagnosticKind::DoubleCoil {
                    device,
                    count: writers.len(),
                },
            });
        }
    }
    diagnostics
}
