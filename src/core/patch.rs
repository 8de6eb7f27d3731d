//! Reversible Änderungen am Programm (Patches).
//!
//! Jede Bearbeitung wird als Folge von [`PatchOp`]s geplant. Jede Operation
//! trägt genug Daten, um ihre Umkehrung ohne Blick auf das Programm zu bilden.
//! Das ist die Grundlage für Undo/Redo.

use super::device::DeviceRef;
use super::element::{Element, ElementId, Operand, Position, RungId};
use super::program::LadderProgram;
use super::rung::{insert_sorted, Branch, Rung};
use super::variable::{VarValue, Variable};
use serde::{Deserialize, Serialize};

/// Eine einzelne, umkehrbare Änderung.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchOp {
    /// Strompfad an Scan-Position einfügen
    InsertRung {
        /// Scan-Position
        index: usize,
        /// Strompfad inkl. Elemente
        rung: Rung,
    },
    /// Strompfad an Scan-Position entfernen
    RemoveRung {
        /// Scan-Position
        index: usize,
        /// Erwarteter Strompfad
        rung: Rung,
    },
    /// Verzweigung einfügen
    InsertBranch {
        /// Besitzender Strompfad
        rung: RungId,
        /// Verzweigung inkl. Elemente
        branch: Branch,
    },
    /// Verzweigung entfernen
    RemoveBranch {
        /// Besitzender Strompfad
        rung: RungId,
        /// Erwartete Verzweigung
        branch: Branch,
    },
    /// Element an seiner Position einfügen
    InsertElement {
        /// Element
        element: Element,
    },
    /// Element entfernen
    RemoveElement {
        /// Erwartetes Element
        element: Element,
    },
    /// Element umsetzen
    MoveElement {
        /// Element-ID
        id: ElementId,
        /// Alte Position
        from: Position,
        /// Neue Position
        to: Position,
    },
    /// Operand eines Pins neu binden
    SetOperand {
        /// Element-ID
        id: ElementId,
        /// Pin-Index
        pin: usize,
        /// Alter Operand
        old: Operand,
        /// Neuer Operand
        new: Operand,
    },
    /// Variable anlegen
    InsertVariable {
        /// Variable; `used_by` wird beim Anwenden aus den Elementen ermittelt
        variable: Variable,
    },
    /// Variable entfernen, sofern ihre Referenzen den erwarteten entsprechen
    RemoveVariable {
        /// Erwartete Variable
        variable: Variable,
    },
    /// Variable umbenennen, alle Referenzen folgen
    RenameVariable {
        /// Alter Name
        from: DeviceRef,
        /// Neuer Name
        to: DeviceRef,
    },
    /// Variablenwert setzen
    SetValue {
        /// Variable
        device: DeviceRef,
        /// Wert vorher
        old: VarValue,
        /// Wert nachher
        new: VarValue,
    },
}

impl PatchOp {
    /// Bildet die Umkehroperation.
    pub fn inverse(&self) -> PatchOp {
        match self.clone() {
            Self::InsertRung { index, rung } => Self::RemoveRung { index, rung },
            Self::RemoveRung { index, rung } => Self::InsertRung { index, rung },
            Self::InsertBranch { rung, branch } => Self::RemoveBranch { rung, branch },
            Self::RemoveBranch { rung, branch } => Self::InsertBranch { rung, branch },
            Self::InsertElement { element } => Self::RemoveElement { element },
            Self::RemoveElement { element } => Self::InsertElement { element },
            Self::MoveElement { id, from, to } => Self::MoveElement { id, from: to, to: from },
            Self::SetOperand { id, pin, old, new } => Self::SetOperand {
                id,
                pin,
                old: new,
                new: old,
            },
            Self::InsertVariable { variable } => Self::RemoveVariable { variable },
            Self::RemoveVariable { variable } => Self::InsertVariable { variable },
            Self::RenameVariable { from, to } => Self::RenameVariable { from: to, to: from },
            Self::SetValue { device, old, new } => Self::SetValue {
                device,
                old: new,
                new: old,
            },
        }
    }
}

/// Geordnete Folge von Operationen, die als Einheit angewendet wird.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Operationen in Anwendungsreihenfolge
    pub ops: Vec<PatchOp>,
}

impl Patch {
    /// Erstellt einen Patch aus Operationen.
    pub fn new(ops: Vec<PatchOp>) -> Self {
        Self { ops }
    }

    /// Umkehr-Patch: umgekehrte Reihenfolge, jede Operation invertiert.
    pub fn inverse(&self) -> Patch {
        Patch {
            ops: self.ops.iter().rev().map(PatchOp::inverse).collect(),
        }
    }

    /// `true`, wenn der Patch nichts ändert.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Fehler beim Anwenden eines Patches (Programm passt nicht zum Patch).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// Strompfad fehlt
    #[error("rung {0} not found")]
    RungNotFound(RungId),
    /// Scan-Position ungültig
    #[error("rung index {index} out of range (len {len})")]
    RungIndexOutOfRange {
        /// Angefragte Position
        index: usize,
        /// Anzahl Strompfade
        len: usize,
    },
    /// Strompfad-ID bereits vergeben
    #[error("rung {0} already exists")]
    DuplicateRung(RungId),
    /// Verzweigung fehlt
    #[error("branch {0} not found")]
    BranchNotFound(u64),
    /// Verzweigungs-ID bereits vergeben
    #[error("branch {0} already exists")]
    DuplicateBranch(u64),
    /// Element fehlt
    #[error("element {0} not found")]
    ElementNotFound(ElementId),
    /// Element-ID bereits vergeben
    #[error("element {0} already exists")]
    DuplicateElement(ElementId),
    /// Zielspalte belegt
    #[error("column {column} of rung {rung} is occupied")]
    SlotOccupied {
        /// Strompfad
        rung: RungId,
        /// Spalte
        column: u16,
    },
    /// Variable fehlt
    #[error("variable {0} not found")]
    VariableNotFound(DeviceRef),
    /// Variable existiert bereits
    #[error("variable {0} already exists")]
    DuplicateVariable(DeviceRef),
    /// Variable wird noch referenziert
    #[error("variable {0} is still referenced")]
    VariableInUse(DeviceRef),
    /// Operand entspricht nicht dem erwarteten Wert
    #[error("operand {pin} of element {id} does not match")]
    OperandMismatch {
        /// Element-ID
        id: ElementId,
        /// Pin-Index
        pin: usize,
    },
}

impl LadderProgram {
    /// Wendet einen Patch atomar an.
    ///
    /// Schlägt eine Operation fehl, werden die bereits angewendeten Operationen
    /// in umgekehrter Reihenfolge zurückgenommen und der Fehler geliefert.
    pub fn apply_patch(&mut self, patch: &Patch) -> Result<(), PatchError> {
        for (applied, op) in patch.ops.iter().enumerate() {
            if let Err(err) = self.apply_op(op) {
                for done in patch.ops[..applied].iter().rev() {
                    if let Err(rollback) = self.apply_op(&done.inverse()) {
                        log::error!("Rollback von {done:?} fehlgeschlagen: {rollback}");
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn apply_op(&mut self, op: &PatchOp) -> Result<(), PatchError> {
        match op {
            PatchOp::InsertRung { index, rung } => {
                if *index > self.rungs.len() {
                    return Err(PatchError::RungIndexOutOfRange {
                        index: *index,
                        len: self.rungs.len(),
                    });
                }
                if self.rung(rung.id).is_some() {
                    return Err(PatchError::DuplicateRung(rung.id));
                }
                for element in rung.all_elements() {
                    self.check_insertable(element)?;
                }
                self.rungs.insert(*index, rung.clone());
                for element in rung.all_elements() {
                    self.link(element);
                }
            }
            PatchOp::RemoveRung { index, rung } => {
                if self.rungs.get(*index).map(|r| r.id) != Some(rung.id) {
                    return Err(PatchError::RungNotFound(rung.id));
                }
                let removed = self.rungs.remove(*index);
                for element in removed.all_elements() {
                    self.unlink(element);
                }
            }
            PatchOp::InsertBranch { rung, branch } => {
                let target = self.rung(*rung).ok_or(PatchError::RungNotFound(*rung))?;
                if target.branch(branch.id).is_some() {
                    return Err(PatchError::DuplicateBranch(branch.id));
                }
                for element in &branch.elements {
                    self.check_insertable(element)?;
                }
                if let Some(target) = self.rung_mut(*rung) {
                    target.insert_branch(branch.clone());
                }
                for element in &branch.elements {
                    self.link(element);
                }
            }
            PatchOp::RemoveBranch { rung, branch } => {
                let target = self.rung_mut(*rung).ok_or(PatchError::RungNotFound(*rung))?;
                let removed = target
                    .remove_branch(branch.id)
                    .ok_or(PatchError::BranchNotFound(branch.id))?;
                for element in &removed.elements {
                    self.unlink(element);
                }
            }
            PatchOp::InsertElement { element } => {
                self.check_insertable(element)?;
                let position = element.position;
                let path = self
                    .rung_mut(position.rung)
                    .ok_or(PatchError::RungNotFound(position.rung))?
                    .path_mut(position.branch)
                    .ok_or(PatchError::BranchNotFound(position.branch.unwrap_or_default()))?;
                if path.iter().any(|e| e.position.column == position.column) {
                    return Err(PatchError::SlotOccupied {
                        rung: position.rung,
                        column: position.column,
                    });
                }
                insert_sorted(path, element.clone());
                self.link(element);
            }
            PatchOp::RemoveElement { element } => {
                let removed = self.take_element(element.id, element.position)?;
                self.unlink(&removed);
            }
            PatchOp::MoveElement { id, from, to } => {
                let mut moving = self.take_element(*id, *from)?;
                moving.position = *to;
                let slot_free = self
                    .rung(to.rung)
                    .and_then(|r| r.path(to.branch))
                    .map(|path| path.iter().all(|e| e.position.column != to.column));
                let error = match slot_free {
                    Some(true) => None,
                    Some(false) => Some(PatchError::SlotOccupied {
                        rung: to.rung,
                        column: to.column,
                    }),
                    None => Some(PatchError::RungNotFound(to.rung)),
                };
                if let Some(error) = error {
                    moving.position = *from;
                    self.put_element(moving);
                    return Err(error);
                }
                self.put_element(moving);
            }
            PatchOp::SetOperand { id, pin, old, new } => {
                if let Operand::Device(device) = new {
                    if !self.variables.contains_key(device) {
                        return Err(PatchError::VariableNotFound(*device));
                    }
                }
                let element = self
                    .element_mut(*id)
                    .ok_or(PatchError::ElementNotFound(*id))?;
                match element.operands.get_mut(*pin) {
                    Some(slot) if *slot == *old => *slot = *new,
                    _ => return Err(PatchError::OperandMismatch { id: *id, pin: *pin }),
                }
                let still_refs_old = old.device().is_some_and(|d| element.references(d));
                if let Some(device) = old.device() {
                    if !still_refs_old {
                        if let Some(variable) = self.variables.get_mut(&device) {
                            variable.used_by.remove(id);
                        }
                    }
                }
                if let Some(device) = new.device() {
                    if let Some(variable) = self.variables.get_mut(&device) {
                        variable.used_by.insert(*id);
                    }
                }
            }
            PatchOp::InsertVariable { variable } => {
                if self.variables.contains_key(&variable.name) {
                    return Err(PatchError::DuplicateVariable(variable.name));
                }
                let mut fresh = variable.clone();
                fresh.used_by = self.referencing_elements(variable.name);
                self.variables.insert(fresh.name, fresh);
            }
            PatchOp::RemoveVariable { variable } => {
                let existing = self
                    .variables
                    .get(&variable.name)
                    .ok_or(PatchError::VariableNotFound(variable.name))?;
                if existing.used_by != variable.used_by {
                    return Err(PatchError::VariableInUse(variable.name));
                }
                self.variables.remove(&variable.name);
            }
            PatchOp::RenameVariable { from, to } => {
                if self.variables.contains_key(to) {
                    return Err(PatchError::DuplicateVariable(*to));
                }
                let mut variable = self
                    .variables
                    .remove(from)
                    .ok_or(PatchError::VariableNotFound(*from))?;
                variable.name = *to;
                for id in &variable.used_by {
                    if let Some(element) = self.element_mut(*id) {
                        for operand in &mut element.operands {
                            if *operand == Operand::Device(*from) {
                                *operand = Operand::Device(*to);
                            }
                        }
                    }
                }
                self.variables.insert(*to, variable);
            }
            PatchOp::SetValue { device, new, .. } => {
                let variable = self
                    .variables
                    .get_mut(device)
                    .ok_or(PatchError::VariableNotFound(*device))?;
                variable.value = *new;
            }
        }
        Ok(())
    }

    /// Prüft ID-Eindeutigkeit und Variablen eines einzufügenden Elements.
    fn check_insertable(&self, element: &Element) -> Result<(), PatchError> {
        if self.element(element.id).is_some() {
            return Err(PatchError::DuplicateElement(element.id));
        }
        match element.devices().find(|d| !self.variables.contains_key(d)) {
            Some(missing) => Err(PatchError::VariableNotFound(missing)),
            None => Ok(()),
        }
    }

    fn link(&mut self, element: &Element) {
        for device in element.devices() {
            if let Some(variable) = self.variables.get_mut(&device) {
                variable.used_by.insert(element.id);
            }
        }
    }

    fn unlink(&mut self, element: &Element) {
        for device in element.devices() {
            if let Some(variable) = self.variables.get_mut(&device) {
                variable.used_by.remove(&element.id);
            }
        }
    }

    fn take_element(&mut self, id: ElementId, at: Position) -> Result<Element, PatchError> {
        let path = self
            .rung_mut(at.rung)
            .ok_or(PatchError::RungNotFound(at.rung))?
            .path_mut(at.branch)
            .ok_or(PatchError::BranchNotFound(at.branch.unwrap_or_default()))?;
        let idx = path
            .iter()
            .position(|e| e.id == id)
            .ok_or(PatchError::ElementNotFound(id))?;
        Ok(path.remove(idx))
    }

    /// Setzt ein Element an seine (vorab geprüfte) Position zurück.
    fn put_element(&mut self, element: Element) {
        let position = element.position;
        match self
            .rung_mut(position.rung)
            .and_then(|r| r.path_mut(position.branch))
        {
            Some(path) => insert_sorted(path, element),
            None => log::error!("Element {} ohne Zielpfad verworfen", element.id),
        }
    }
}
