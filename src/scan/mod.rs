//! Scan-Zyklus: wertet alle Strompfade in Programmreihenfolge aus.
//!
//! Werte werden "on the fly" geschrieben: ein Strompfad sieht die Ausgaben
//! aller vorher ausgewerteten Strompfade desselben Zyklus. Innerhalb eines
//! Strompfads läuft der Stromfluss spaltenweise von links nach rechts,
//! parallele Verzweigungen werden an ihrer Wiedervereinigung ODER-verknüpft.

mod rules;

use crate::core::{
    DeviceRef, Element, ElementId, LadderProgram, Rung, RungId, VarValue, Variable,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Art eines Laufzeitfehlers im Scan-Zyklus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FaultKind {
    /// Division durch Null
    DivideByZero,
    /// Ergebnis passt nicht in ein 32-Bit-Register
    Overflow,
    /// Negativer Sollwert an Timer oder Zähler
    NegativePreset,
    /// Operand verweist auf eine nicht deklarierte Variable
    DanglingVariable(DeviceRef),
}

/// Laufzeitfehler eines Elements. Der Zyklus läuft weiter, das betroffene
/// Element schreibt in diesem Zyklus nichts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanFault {
    /// Strompfad
    pub rung: RungId,
    /// Element
    pub element: ElementId,
    /// Fehlerart
    pub kind: FaultKind,
}

impl fmt::Display for ScanFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rung {} element {}: ", self.rung, self.element)?;
        match self.kind {
            FaultKind::DivideByZero => write!(f, "divide by zero"),
            FaultKind::Overflow => write!(f, "arithmetic overflow"),
            FaultKind::NegativePreset => write!(f, "negative preset"),
            FaultKind::DanglingVariable(device) => write!(f, "undeclared variable {device}"),
        }
    }
}

/// Ergebnis eines Scan-Zyklus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Verstrichene Zeit in Ticks
    pub elapsed: i32,
    /// Laufzeitfehler in Scan-Reihenfolge
    pub faults: Vec<ScanFault>,
    /// Variablen, deren Wert sich geändert hat
    pub changed: Vec<DeviceRef>,
    /// Strompfade mit Stromfluss an der rechten Schiene
    pub energized: Vec<RungId>,
}

impl CycleReport {
    /// `true`, wenn der Zyklus fehlerfrei lief.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Timer/Zähler, die über ihren Istwert per RES zurückgesetzt werden können.
struct ResetTarget {
    element: ElementId,
    done: Option<DeviceRef>,
}

/// Zustand, den die Element-Regeln während eines Zyklus teilen.
pub(crate) struct ScanContext<'a> {
    variables: &'a mut BTreeMap<DeviceRef, Variable>,
    elapsed: i32,
    rung: RungId,
    faults: Vec<ScanFault>,
    reset_targets: BTreeMap<DeviceRef, Vec<ResetTarget>>,
    pending_resets: BTreeSet<ElementId>,
}

/// Führt einen Scan-Zyklus direkt auf dem Programm aus.
///
/// `elapsed` ist die seit dem letzten Zyklus verstrichene Zeit in Ticks
/// (negative Werte zählen als 0).
pub fn run_cycle(program: &mut LadderProgram, elapsed: i32) -> CycleReport {
    let elapsed = elapsed.max(0);
    let reset_targets = collect_reset_targets(program);
    let before: Vec<VarValue> = program.variables.values().map(|v| v.value).collect();

    let LadderProgram { variables, rungs } = &mut *program;
    let mut ctx = ScanContext {
        variables,
        elapsed,
        rung: 0,
        faults: Vec::new(),
        reset_targets,
        pending_resets: BTreeSet::new(),
    };

    let mut energized = Vec::new();
    for rung in rungs.iter_mut() {
        ctx.rung = rung.id;
        if evaluate_rung(rung, &mut ctx) {
            energized.push(rung.id);
        }
    }

    // Timer/Zähler, die vor ihrem RES ausgewertet wurden
    for id in std::mem::take(&mut ctx.pending_resets) {
        if let Some(element) = rungs
            .iter_mut()
            .flat_map(|r| r.all_elements_mut())
            .find(|e| e.id == id)
        {
            element.reset_state();
        }
    }

    let faults = ctx.faults;
    let changed = program
        .variables
        .values()
        .zip(before)
        .filter(|(variable, old)| variable.value != *old)
        .map(|(variable, _)| variable.name)
        .collect();

    if let Some(first) = faults.first() {
        log::warn!("Scan-Zyklus mit {} Fehler(n), erster: {first}", faults.len());
    }
    log::trace!(
        "Scan-Zyklus: {} Strompfade, {} Fehler",
        program.rungs.len(),
        faults.len()
    );

    CycleReport {
        elapsed,
        faults,
        changed,
        energized,
    }
}

/// Reine Variante: liefert das Folgeprogramm, das Eingangsprogramm bleibt unverändert.
pub fn evaluate_cycle(program: &LadderProgram, elapsed: i32) -> (LadderProgram, CycleReport) {
    let mut next = program.clone();
    let report = run_cycle(&mut next, elapsed);
    (next, report)
}

fn collect_reset_targets(program: &LadderProgram) -> BTreeMap<DeviceRef, Vec<ResetTarget>> {
    let mut targets: BTreeMap<DeviceRef, Vec<ResetTarget>> = BTreeMap::new();
    for element in program.all_elements() {
        if !(element.kind.is_timer() || element.kind.is_counter()) {
            continue;
        }
        if let Some(accumulator) = element.operand(1).and_then(|op| op.device()) {
            targets.entry(accumulator).or_default().push(ResetTarget {
                element: element.id,
                done: element.operand(2).and_then(|op| op.device()),
            });
        }
    }
    targets
}

/// Wertet einen Strompfad aus und liefert den Stromfluss an der rechten Schiene.
fn evaluate_rung(rung: &mut Rung, ctx: &mut ScanContext) -> bool {
    let Rung {
        width,
        elements,
        branches,
        ..
    } = rung;
    let mut power = true;
    let mut column = 0u16;

    while column < *width {
        let span_end = branches
            .iter()
            .filter(|b| b.start_column == column)
            .map(|b| b.end_column)
            .max();
        match span_end {
            Some(end) => {
                let span = column..end;
                let mut joined = evaluate_series(
                    elements
                        .iter_mut()
                        .filter(|e| span.contains(&e.position.column)),
                    power,
                    ctx,
                );
                for branch in branches.iter_mut().filter(|b| b.start_column == column) {
                    joined |= evaluate_series(branch.elements.iter_mut(), power, ctx);
                }
                power = joined;
                column = end.max(column + 1);
            }
            None => {
                if let Some(element) = elements.iter_mut().find(|e| e.position.column == column) {
                    power = rules::evaluate(element, power, ctx);
                }
                column += 1;
            }
        }
    }
    power
}

/// Reihenschaltung: jedes Element bekommt den Ausgang seines Vorgängers.
fn evaluate_series<'e>(
    elements: impl Iterator<Item = &'e mut Element>,
    mut power: bool,
    ctx: &mut ScanContext,
) -> bool {
    for element in elements {
        power = rules::evaluate(element, power, ctx);
    }
    power
}
