//! Das Kontaktplan-Programm: Strompfade in Scan-Reihenfolge plus Variablentabelle.

use super::catalog::{CompareOp, ElementKind, MathOp};
use super::device::{DeviceKind, DeviceRef};
use super::element::{BranchId, Element, ElementId, Operand, Position, RungId};
use super::rung::{Branch, Rung, DEFAULT_RUNG_WIDTH};
use super::variable::{VarValue, Variable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Vollständiges Kontaktplan-Programm.
///
/// Die Reihenfolge von `rungs` ist die Scan-Reihenfolge. Variablen sind nach
/// Device sortiert abgelegt, damit Ausgaben und Persistenz deterministisch sind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderProgram {
    /// Variablentabelle
    #[serde(with = "variable_list")]
    pub variables: BTreeMap<DeviceRef, Variable>,
    /// Strompfade in Scan-Reihenfolge
    pub rungs: Vec<Rung>,
}

impl LadderProgram {
    /// Erstellt ein leeres Programm.
    pub fn new() -> Self {
        Self::default()
    }

    /// Beispielprogramm: Selbsthaltung, Timer, Zähler mit Reset und ein Rechenbaustein.
    pub fn sample() -> Self {
        use DeviceKind::*;
        let dev = |kind, address| Operand::Device(DeviceRef::new(kind, address));
        let mut program = Self::new();
        let mut next_id: ElementId = 0;
        let mut element = |kind: ElementKind, operands: Vec<Operand>, rung: RungId, column: u16, branch: Option<BranchId>| {
            next_id += 1;
            Element::new(next_id, kind, operands, Position { rung, column, branch })
        };

        // Start/Stop mit Selbsthaltung
        let mut motor = Rung::new(1, DEFAULT_RUNG_WIDTH);
        motor.elements.push(element(ElementKind::NormallyOpen, vec![dev(DiscreteInput, 0)], 1, 0, None));
        motor.elements.push(element(ElementKind::NormallyClosed, vec![dev(DiscreteInput, 1)], 1, 1, None));
        motor.elements.push(element(ElementKind::OutputEnergize, vec![dev(DiscreteOutput, 0)], 1, 9, None));
        let mut hold = Branch::new(1, 0, 1);
        hold.elements.push(element(ElementKind::NormallyOpen, vec![dev(DiscreteOutput, 0)], 1, 0, Some(1)));
        motor.branches.push(hold);

        let mut timer = Rung::new(2, DEFAULT_RUNG_WIDTH);
        timer.elements.push(element(ElementKind::NormallyOpen, vec![dev(DiscreteOutput, 0)], 2, 0, None));
        timer.elements.push(element(
            ElementKind::TimerOnDelay,
            vec![Operand::Constant(30), dev(TimerAccumulator, 0), dev(InternalRelay, 0)],
            2,
            9,
            None,
        ));

        let mut counter = Rung::new(3, DEFAULT_RUNG_WIDTH);
        counter.elements.push(element(ElementKind::OneShotRising, vec![dev(DiscreteInput, 2)], 3, 0, None));
        counter.elements.push(element(
            ElementKind::CountUp,
            vec![Operand::Constant(5), dev(CounterAccumulator, 0), dev(InternalRelay, 1)],
            3,
            9,
            None,
        ));

        let mut reset = Rung::new(4, DEFAULT_RUNG_WIDTH);
        reset.elements.push(element(ElementKind::NormallyOpen, vec![dev(DiscreteInput, 3)], 4, 0, None));
        reset.elements.push(element(ElementKind::Reset, vec![dev(CounterAccumulator, 0)], 4, 9, None));

        let mut math = Rung::new(5, DEFAULT_RUNG_WIDTH);
        math.elements.push(element(ElementKind::OneShotRising, vec![dev(InternalRelay, 0)], 5, 0, None));
        math.elements.push(element(
            ElementKind::Math(MathOp::Add),
            vec![dev(DataRegister, 0), Operand::Constant(1), dev(DataRegister, 0)],
            5,
            9,
            None,
        ));

        let mut alarm = Rung::new(6, DEFAULT_RUNG_WIDTH);
        alarm.elements.push(element(
            ElementKind::Compare(CompareOp::Geq),
            vec![dev(DataRegister, 0), Operand::Constant(3), dev(InternalRelay, 2)],
            6,
            0,
            None,
        ));
        alarm.elements.push(element(ElementKind::OutputEnergize, vec![dev(DiscreteOutput, 1)], 6, 9, None));

        program.rungs = vec![motor, timer, counter, reset, math, alarm];
        program.declare_referenced_variables();
        program
    }

    /// Legt fehlende Variablen für alle referenzierten Devices an.
    fn declare_referenced_variables(&mut self) {
        let devices: Vec<DeviceRef> = self.all_elements().flat_map(|e| e.devices()).collect();
        for device in devices {
            self.variables
                .entry(device)
                .or_insert_with(|| Variable::new(device));
        }
        self.rebuild_used_by();
    }

    /// Baut den `used_by`-Index aller Variablen neu auf (z.B. nach dem Laden).
    ///
    /// Referenzen auf nicht deklarierte Variablen bleiben unverändert und werden
    /// von der Programmprüfung bzw. dem Scan-Zyklus gemeldet.
    pub fn rebuild_used_by(&mut self) {
        for variable in self.variables.values_mut() {
            variable.used_by.clear();
        }
        let refs: Vec<(DeviceRef, ElementId)> = self
            .all_elements()
            .flat_map(|e| e.devices().map(move |d| (d, e.id)))
            .collect();
        for (device, id) in refs {
            if let Some(variable) = self.variables.get_mut(&device) {
                variable.used_by.insert(id);
            }
        }
    }

    /// IDs aller Elemente, die das Device referenzieren.
    pub fn referencing_elements(&self, device: DeviceRef) -> BTreeSet<ElementId> {
        self.all_elements()
            .filter(|e| e.references(device))
            .map(|e| e.id)
            .collect()
    }

    /// Strompfad nach ID.
    pub fn rung(&self, id: RungId) -> Option<&Rung> {
        self.rungs.iter().find(|r| r.id == id)
    }

    /// Veränderbarer Strompfad nach ID.
    pub fn rung_mut(&mut self, id: RungId) -> Option<&mut Rung> {
        self.rungs.iter_mut().find(|r| r.id == id)
    }

    /// Scan-Position eines Strompfads.
    pub fn rung_index(&self, id: RungId) -> Option<usize> {
        self.rungs.iter().position(|r| r.id == id)
    }

    /// Alle Elemente in Scan-Reihenfolge der Strompfade.
    pub fn all_elements(&self) -> impl Iterator<Item = &Element> {
        self.rungs.iter().flat_map(|r| r.all_elements())
    }

    /// Element nach ID.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.all_elements().find(|e| e.id == id)
    }

    /// Veränderbares Element nach ID.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.rungs
            .iter_mut()
            .flat_map(|r| r.all_elements_mut())
            .find(|e| e.id == id)
    }

    /// Variable nach Device.
    pub fn variable(&self, device: DeviceRef) -> Option<&Variable> {
        self.variables.get(&device)
    }

    /// Aktueller Wert einer Variable.
    pub fn value(&self, device: DeviceRef) -> Option<VarValue> {
        self.variables.get(&device).map(|v| v.value)
    }

    /// Nächste freie Strompfad-ID (max + 1).
    pub fn next_rung_id(&self) -> RungId {
        self.rungs.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    /// Nächste freie Element-ID (max + 1).
    pub fn next_element_id(&self) -> ElementId {
        self.all_elements().map(|e| e.id).max().unwrap_or(0) + 1
    }

    /// Nächste freie Verzweigungs-ID (max + 1, programmweit).
    pub fn next_branch_id(&self) -> BranchId {
        self.rungs
            .iter()
            .flat_map(|r| r.branches.iter().map(|b| b.id))
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Gibt die Anzahl der Strompfade zurück
    pub fn rung_count(&self) -> usize {
        self.rungs.len()
    }

    /// Gibt die Anzahl aller Elemente zurück
    pub fn element_count(&self) -> usize {
        self.all_elements().count()
    }

    /// Gibt die Anzahl der Variablen zurück
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }
}

/// Variablen werden als Liste persistiert (Device steckt in `name`).
mod variable_list {
    use super::{DeviceRef, Variable};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<DeviceRef, Variable>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&Variable> = map.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<DeviceRef, Variable>, D::Error> {
        let list = Vec::<Variable>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|v| (v.name, v)).collect())
    }
}
