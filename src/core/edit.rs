//! Bearbeitungsbefehle und ihre Planung zu Patches.
//!
//! [`plan`] prüft einen Befehl gegen das aktuelle Programm und liefert den
//! Vorwärts-Patch, ohne das Programm zu verändern. Operanden-Text läuft dabei
//! immer durch die Geräte-Validierung bzw. den `K<n>`-Parser.

use super::catalog::{ElementClass, ElementKind, PinRole};
use super::device::{validate_device_text, DeviceError, DeviceRef};
use super::element::{BranchId, Element, ElementId, Operand, Position, RungId};
use super::patch::{Patch, PatchOp};
use super::program::LadderProgram;
use super::rung::{rung_output_stage_ok, Branch, PathSlot, Rung};
use super::variable::{VarValue, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ein Bearbeitungsbefehl der Editing-API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditCommand {
    /// Leeren Strompfad einfügen (`None` = anhängen)
    AddRung {
        /// Scan-Position
        index: Option<usize>,
        /// Spaltenanzahl
        width: u16,
    },
    /// Strompfad samt Elementen löschen
    DeleteRung {
        /// Strompfad
        rung: RungId,
    },
    /// Strompfad an neue Scan-Position verschieben
    MoveRung {
        /// Strompfad
        rung: RungId,
        /// Ziel-Position
        index: usize,
    },
    /// Parallele Verzweigung anlegen
    AddBranch {
        /// Strompfad
        rung: RungId,
        /// Erste Spalte
        start_column: u16,
        /// Spalte nach der Wiedervereinigung
        end_column: u16,
    },
    /// Verzweigung samt Elementen löschen
    DeleteBranch {
        /// Strompfad
        rung: RungId,
        /// Verzweigung
        branch: BranchId,
    },
    /// Element in einen freien Platz einfügen
    AddElement {
        /// Strompfad
        rung: RungId,
        /// Spalte
        column: u16,
        /// Verzweigung (`None` = Hauptpfad)
        branch: Option<BranchId>,
        /// Elementart
        kind: ElementKind,
        /// Operanden-Texte in Pin-Reihenfolge
        operands: Vec<String>,
    },
    /// Element ablegen; belegte Plätze rücken nach rechts
    DropElement {
        /// Strompfad
        rung: RungId,
        /// Spalte
        column: u16,
        /// Verzweigung (`None` = Hauptpfad)
        branch: Option<BranchId>,
        /// Elementart
        kind: ElementKind,
        /// Operanden-Texte in Pin-Reihenfolge
        operands: Vec<String>,
    },
    /// Element löschen
    DeleteElement {
        /// Element
        element: ElementId,
    },
    /// Element innerhalb seines Pfads auf eine andere Spalte setzen
    MoveElement {
        /// Element
        element: ElementId,
        /// Zielspalte
        column: u16,
    },
    /// Operand eines Pins neu binden
    SetOperand {
        /// Element
        element: ElementId,
        /// Pin-Index
        pin: usize,
        /// Operanden-Text
        text: String,
    },
    /// Variable deklarieren
    AddVariable {
        /// Geräte-Text
        device: String,
    },
    /// Unreferenzierte Variable löschen
    DeleteVariable {
        /// Geräte-Text
        device: String,
    },
    /// Variable umbenennen (alle Referenzen folgen)
    RenameVariable {
        /// Alter Geräte-Text
        from: String,
        /// Neuer Geräte-Text
        to: String,
    },
    /// Wert einer Variable setzen (Forcen)
    SetVariableValue {
        /// Geräte-Text
        device: String,
        /// Neuer Wert
        value: VarValue,
    },
}

impl EditCommand {
    /// Kurzbeschreibung für Log und History.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddRung { .. } => "Strompfad einfügen",
            Self::DeleteRung { .. } => "Strompfad löschen",
            Self::MoveRung { .. } => "Strompfad verschieben",
            Self::AddBranch { .. } => "Verzweigung einfügen",
            Self::DeleteBranch { .. } => "Verzweigung löschen",
            Self::AddElement { .. } => "Element einfügen",
            Self::DropElement { .. } => "Element ablegen",
            Self::DeleteElement { .. } => "Element löschen",
            Self::MoveElement { .. } => "Element verschieben",
            Self::SetOperand { .. } => "Operand zuweisen",
            Self::AddVariable { .. } => "Variable anlegen",
            Self::DeleteVariable { .. } => "Variable löschen",
            Self::RenameVariable { .. } => "Variable umbenennen",
            Self::SetVariableValue { .. } => "Variablenwert setzen",
        }
    }
}

/// Fehler bei der Planung eines Bearbeitungsbefehls.
///
/// Ein Fehler lässt Programm und History unverändert.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Operanden- oder Geräte-Text ungültig
    #[error("invalid device '{text}': {source}")]
    InvalidDevice {
        /// Eingegebener Text
        text: String,
        /// Validierungsfehler
        #[source]
        source: DeviceError,
    },
    /// Pflicht-Operand ist leer
    #[error("operand '{pin}' is not bound")]
    MissingOperand {
        /// Pin-Name
        pin: &'static str,
    },
    /// Platz bereits belegt
    #[error("column {column} of rung {rung} is occupied")]
    SlotOccupied {
        /// Strompfad
        rung: RungId,
        /// Spalte
        column: u16,
    },
    /// Timer-/Zähler-Istwerte sind schreibgeschützt
    #[error("variable {0} is read-only")]
    ReadOnlyVariable(DeviceRef),
    /// Strompfad fehlt
    #[error("rung {0} not found")]
    RungNotFound(RungId),
    /// Scan-Position außerhalb des Programms
    #[error("rung index {index} out of range (len {len})")]
    RungIndexOutOfRange {
        /// Angefragte Position
        index: usize,
        /// Anzahl Strompfade
        len: usize,
    },
    /// Element fehlt
    #[error("element {0} not found")]
    ElementNotFound(ElementId),
    /// Verzweigung fehlt
    #[error("branch {0} not found")]
    BranchNotFound(BranchId),
    /// Variable fehlt
    #[error("variable {0} not found")]
    VariableNotFound(DeviceRef),
    /// Spalte außerhalb des Pfads
    #[error("column {column} outside {start}..{end}")]
    ColumnOutOfRange {
        /// Angefragte Spalte
        column: u16,
        /// Erste gültige Spalte
        start: u16,
        /// Erste ungültige Spalte
        end: u16,
    },
    /// Verzweigung leer, zu breit oder teilweise überlappend
    #[error("invalid branch span {start}..{end}")]
    InvalidBranchSpan {
        /// Startspalte
        start: u16,
        /// Endspalte
        end: u16,
    },
    /// Eingangsanweisung rechts einer Ausgangsanweisung
    #[error("input instruction right of an output instruction")]
    OutputStageViolation,
    /// Falsche Anzahl Operanden
    #[error("{mnemonic} expects {expected} operands, got {got}")]
    OperandCount {
        /// Elementart
        mnemonic: &'static str,
        /// Erwartet
        expected: usize,
        /// Erhalten
        got: usize,
    },
    /// Operand passt nicht zur Pin-Rolle
    #[error("operand {operand} not allowed for pin '{pin}'")]
    OperandTypeMismatch {
        /// Pin-Name
        pin: &'static str,
        /// Operand
        operand: Operand,
    },
    /// Wert passt nicht zur Geräteart
    #[error("value {value} does not fit variable {device}")]
    ValueTypeMismatch {
        /// Variable
        device: DeviceRef,
        /// Wert
        value: VarValue,
    },
    /// Variable existiert bereits
    #[error("variable {0} already exists")]
    DuplicateVariable(DeviceRef),
    /// Variable wird noch referenziert
    #[error("variable {device} is used by {count} element(s)")]
    VariableInUse {
        /// Variable
        device: DeviceRef,
        /// Anzahl Referenzen
        count: usize,
    },
    /// Kein Platz zum Nachrücken
    #[error("rung {0} is full")]
    RungFull(RungId),
    /// Pin-Index existiert nicht
    #[error("element {element} has no pin {pin}")]
    PinOutOfRange {
        /// Element
        element: ElementId,
        /// Pin-Index
        pin: usize,
    },
}

/// Plant einen Befehl gegen das aktuelle Programm.
pub fn plan(program: &LadderProgram, command: &EditCommand) -> Result<Patch, EditError> {
    match command {
        EditCommand::AddRung { index, width } => {
            let len = program.rungs.len();
            let index = index.unwrap_or(len);
            if index > len {
                return Err(EditError::RungIndexOutOfRange { index, len });
            }
            let rung = Rung::new(program.next_rung_id(), (*width).max(1));
            Ok(Patch::new(vec![PatchOp::InsertRung { index, rung }]))
        }
        EditCommand::DeleteRung { rung } => {
            let index = program
                .rung_index(*rung)
                .ok_or(EditError::RungNotFound(*rung))?;
            Ok(Patch::new(vec![PatchOp::RemoveRung {
                index,
                rung: program.rungs[index].clone(),
            }]))
        }
        EditCommand::MoveRung { rung, index } => {
            let from = program
                .rung_index(*rung)
                .ok_or(EditError::RungNotFound(*rung))?;
            let len = program.rungs.len();
            if *index >= len {
                return Err(EditError::RungIndexOutOfRange { index: *index, len });
            }
            if from == *index {
                return Ok(Patch::default());
            }
            let moved = program.rungs[from].clone();
            Ok(Patch::new(vec![
                PatchOp::RemoveRung {
                    index: from,
                    rung: moved.clone(),
                },
                PatchOp::InsertRung {
                    index: *index,
                    rung: moved,
                },
            ]))
        }
        EditCommand::AddBranch {
            rung,
            start_column,
            end_column,
        } => plan_add_branch(program, *rung, *start_column, *end_column),
        EditCommand::DeleteBranch { rung, branch } => {
            let target = program.rung(*rung).ok_or(EditError::RungNotFound(*rung))?;
            let found = target
                .branch(*branch)
                .ok_or(EditError::BranchNotFound(*branch))?;
            Ok(Patch::new(vec![PatchOp::RemoveBranch {
                rung: *rung,
                branch: found.clone(),
            }]))
        }
        EditCommand::AddElement {
            rung,
            column,
            branch,
            kind,
            operands,
        } => {
            let position = Position {
                rung: *rung,
                column: *column,
                branch: *branch,
            };
            plan_insert(program, position, *kind, operands, false)
        }
        EditCommand::DropElement {
            rung,
            column,
            branch,
            kind,
            operands,
        } => {
            let position = Position {
                rung: *rung,
                column: *column,
                branch: *branch,
            };
            plan_insert(program, position, *kind, operands, true)
        }
        EditCommand::DeleteElement { element } => {
            let found = program
                .element(*element)
                .ok_or(EditError::ElementNotFound(*element))?;
            Ok(Patch::new(vec![PatchOp::RemoveElement {
                element: found.clone(),
            }]))
        }
        EditCommand::MoveElement { element, column } => {
            plan_move_element(program, *element, *column)
        }
        EditCommand::SetOperand { element, pin, text } => {
            plan_set_operand(program, *element, *pin, text)
        }
        EditCommand::AddVariable { device } => {
            let device = parse_device(device)?;
            if program.variable(device).is_some() {
                return Err(EditError::DuplicateVariable(device));
            }
            Ok(Patch::new(missing_variables(program, &[Operand::Device(device)])))
        }
        EditCommand::DeleteVariable { device } => {
            let device = parse_device(device)?;
            let variable = program
                .variable(device)
                .ok_or(EditError::VariableNotFound(device))?;
            if !variable.used_by.is_empty() {
                return Err(EditError::VariableInUse {
                    device,
                    count: variable.used_by.len(),
                });
            }
            Ok(Patch::new(vec![PatchOp::RemoveVariable {
                variable: variable.clone(),
            }]))
        }
        EditCommand::RenameVariable { from, to } => plan_rename(program, from, to),
        EditCommand::SetVariableValue { device, value } => {
            let device = parse_device(device)?;
            let variable = program
                .variable(device)
                .ok_or(EditError::VariableNotFound(device))?;
            if !variable.is_forceable() {
                return Err(EditError::ReadOnlyVariable(device));
            }
            if !value.matches_kind(device.kind) {
                return Err(EditError::ValueTypeMismatch {
                    device,
                    value: *value,
                });
            }
            if variable.value == *value {
                return Ok(Patch::default());
            }
            Ok(Patch::new(vec![PatchOp::SetValue {
                device,
                old: variable.value,
                new: *value,
            }]))
        }
    }
}

/// Parst Geräte-Text; leerer Text ist hier ein Fehler.
fn parse_device(text: &str) -> Result<DeviceRef, EditError> {
    match validate_device_text(text) {
        Ok(Some(device)) => Ok(device),
        Ok(None) => Err(EditError::InvalidDevice {
            text: text.to_string(),
            source: DeviceError::NonDigitSuffix,
        }),
        Err(source) => Err(EditError::InvalidDevice {
            text: text.to_string(),
            source,
        }),
    }
}

/// Parst und prüft einen Operanden gegen seine Pin-Rolle.
fn bind_operand(text: &str, pin: &'static str, role: PinRole) -> Result<Operand, EditError> {
    let operand = Operand::parse(text)
        .map_err(|source| EditError::InvalidDevice {
            text: text.to_string(),
            source,
        })?
        .ok_or(EditError::MissingOperand { pin })?;
    let accepted = match operand {
        Operand::Device(device) => role.accepts_device(device.kind),
        Operand::Constant(_) => role.accepts_constant(),
    };
    if accepted {
        Ok(operand)
    } else {
        Err(EditError::OperandTypeMismatch { pin, operand })
    }
}

/// Variablen, die vor dem Binden neu angelegt werden müssen.
///
/// Bereits verdrahtete, aber nicht deklarierte Devices tragen ihre Referenzen
/// mit, damit das Rückgängigmachen sie wieder entfernen kann.
fn missing_variables(program: &LadderProgram, operands: &[Operand]) -> Vec<PatchOp> {
    let mut seen = BTreeSet::new();
    operands
        .iter()
        .filter_map(|op| op.device())
        .filter(|d| program.variable(*d).is_none() && seen.insert(*d))
        .map(|d| {
            let mut variable = Variable::new(d);
            variable.used_by = program.referencing_elements(d);
            PatchOp::InsertVariable { variable }
        })
        .collect()
}

/// Prüft Spalte und Pfad einer Zielposition.
fn check_slot_range(rung: &Rung, position: Position) -> Result<(), EditError> {
    let range = rung
        .column_range(position.branch)
        .ok_or(EditError::BranchNotFound(position.branch.unwrap_or_default()))?;
    if !range.contains(&position.column) {
        return Err(EditError::ColumnOutOfRange {
            column: position.column,
            start: range.start,
            end: range.end,
        });
    }
    Ok(())
}

fn plan_insert(
    program: &LadderProgram,
    position: Position,
    kind: ElementKind,
    texts: &[String],
    shift_right: bool,
) -> Result<Patch, EditError> {
    let rung = program
        .rung(position.rung)
        .ok_or(EditError::RungNotFound(position.rung))?;
    check_slot_range(rung, position)?;

    let spec = kind.spec();
    if texts.len() != spec.arity() {
        return Err(EditError::OperandCount {
            mnemonic: spec.mnemonic,
            expected: spec.arity(),
            got: texts.len(),
        });
    }
    let operands = spec
        .pins
        .iter()
        .zip(texts)
        .map(|(pin, text)| bind_operand(text, pin.name, pin.role))
        .collect::<Result<Vec<_>, _>>()?;

    let path = rung.path(position.branch).map(Vec::as_slice).unwrap_or(&[]);
    let mut ops = Vec::new();
    let mut layout: Vec<(u16, ElementClass)> = Vec::new();
    let occupied = path.iter().any(|e| e.position.column == position.column);
    if occupied && !shift_right {
        return Err(EditError::SlotOccupied {
            rung: position.rung,
            column: position.column,
        });
    }
    if occupied {
        // Nur der zusammenhängende Block ab der Zielspalte rückt nach
        let mut block_end = position.column;
        while path.iter().any(|e| e.position.column == block_end) {
            block_end += 1;
        }
        let range_end = rung
            .column_range(position.branch)
            .map(|r| r.end)
            .unwrap_or(rung.width);
        if block_end >= range_end {
            return Err(EditError::RungFull(position.rung));
        }
        for element in path.iter().rev() {
            let column = element.position.column;
            if (position.column..block_end).contains(&column) {
                ops.push(PatchOp::MoveElement {
                    id: element.id,
                    from: element.position,
                    to: Position {
                        column: column + 1,
                        ..element.position
                    },
                });
                layout.push((column + 1, element.kind.spec().class));
            } else {
                layout.push((column, element.kind.spec().class));
            }
        }
    } else {
        layout.extend(path.iter().map(|e| (e.position.column, e.kind.spec().class)));
    }
    layout.push((position.column, spec.class));
    let slots: Vec<PathSlot> = rung
        .all_elements()
        .filter(|e| e.position.branch != position.branch)
        .map(|e| (e.position.branch, e.position.column, e.kind.spec().class))
        .chain(layout.into_iter().map(|(c, class)| (position.branch, c, class)))
        .collect();
    if !rung_output_stage_ok(rung, &slots) {
        return Err(EditError::OutputStageViolation);
    }

    ops.extend(missing_variables(program, &operands));
    let element = Element::new(program.next_element_id(), kind, operands, position);
    ops.push(PatchOp::InsertElement { element });
    Ok(Patch::new(ops))
}

fn plan_add_branch(
    program: &LadderProgram,
    rung_id: RungId,
    start: u16,
    end: u16,
) -> Result<Patch, EditError> {
    let rung = program.rung(rung_id).ok_or(EditError::RungNotFound(rung_id))?;
    if start >= end || end > rung.width {
        return Err(EditError::InvalidBranchSpan { start, end });
    }
    if rung.branches.iter().any(|b| b.conflicts_with(start, end)) {
        return Err(EditError::InvalidBranchSpan { start, end });
    }
    Ok(Patch::new(vec![PatchOp::InsertBranch {
        rung: rung_id,
        branch: Branch::new(program.next_branch_id(), start, end),
    }]))
}

fn plan_move_element(
    program: &LadderProgram,
    id: ElementId,
    column: u16,
) -> Result<Patch, EditError> {
    let element = program.element(id).ok_or(EditError::ElementNotFound(id))?;
    let from = element.position;
    if from.column == column {
        return Ok(Patch::default());
    }
    let rung = program
        .rung(from.rung)
        .ok_or(EditError::RungNotFound(from.rung))?;
    let to = Position { column, ..from };
    check_slot_range(rung, to)?;
    if rung.element_at(from.branch, column).is_some() {
        return Err(EditError::SlotOccupied {
            rung: from.rung,
            column,
        });
    }
    let slots: Vec<PathSlot> = rung
        .all_elements()
        .map(|e| {
            let c = if e.id == id { column } else { e.position.column };
            (e.position.branch, c, e.kind.spec().class)
        })
        .collect();
    if !rung_output_stage_ok(rung, &slots) {
        return Err(EditError::OutputStageViolation);
    }
    Ok(Patch::new(vec![PatchOp::MoveElement { id, from, to }]))
}

fn plan_set_operand(
    program: &LadderProgram,
    id: ElementId,
    pin: usize,
    text: &str,
) -> Result<Patch, EditError> {
    let element = program.element(id).ok_or(EditError::ElementNotFound(id))?;
    let spec = element.kind.spec();
    let (pin_spec, old) = spec
        .pins
        .get(pin)
        .zip(element.operand(pin))
        .ok_or(EditError::PinOutOfRange { element: id, pin })?;
    let new = bind_operand(text, pin_spec.name, pin_spec.role)?;
    if new == old {
        return Ok(Patch::default());
    }
    let mut ops = missing_variables(program, &[new]);
    ops.push(PatchOp::SetOperand { id, pin, old, new });
    Ok(Patch::new(ops))
}

fn plan_rename(program: &LadderProgram, from: &str, to: &str) -> Result<Patch, EditError> {
    let from = parse_device(from)?;
    let to = parse_device(to)?;
    let variable = program
        .variable(from)
        .ok_or(EditError::VariableNotFound(from))?;
    if from == to {
        return Ok(Patch::default());
    }
    if program.variable(to).is_some() {
        return Err(EditError::DuplicateVariable(to));
    }
    if from.kind.is_discrete() != to.kind.is_discrete() {
        return Err(EditError::ValueTypeMismatch {
            device: to,
            value: variable.value,
        });
    }
    // Jede Referenz muss auch mit dem neuen Namen zur Pin-Rolle passen
    for element in variable.used_by.iter().filter_map(|id| program.element(*id)) {
        for (pin, operand) in element.kind.spec().pins.iter().zip(&element.operands) {
            if *operand == Operand::Device(from) && !pin.role.accepts_device(to.kind) {
                return Err(EditError::OperandTypeMismatch {
                    pin: pin.name,
                    operand: Operand::Device(to),
                });
            }
        }
    }
    Ok(Patch::new(vec![PatchOp::RenameVariable { from, to }]))
}
