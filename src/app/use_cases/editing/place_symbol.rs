//! Use-Case: Commit-Event der Symbol-Eingabe als Element einfügen.

use super::apply_edit;
use crate::app::state::{SymbolCommit, SymbolInstruction};
use crate::app::AppState;
use crate::core::{EditCommand, EditError, ElementClass, ElementKind, Rung, RungId};

/// Zielspalte im Hauptpfad für eine Anweisung.
///
/// Kontakte landen in der ersten freien Spalte vor der Ausgangsstufe,
/// Spulen in der am weitesten rechts liegenden freien Spalte hinter dem
/// letzten Eingang.
pub fn symbol_column(rung: &Rung, instruction: SymbolInstruction) -> Option<u16> {
    let free = |column: u16| rung.element_at(None, column).is_none();
    let class_columns = |class: ElementClass| {
        rung.elements
            .iter()
            .filter(move |e| e.kind.spec().class == class)
            .map(|e| e.position.column)
    };

    match instruction {
        SymbolInstruction::Contact => {
            let stage_start = class_columns(ElementClass::Output).min().unwrap_or(rung.width);
            (0..stage_start).find(|&c| free(c))
        }
        SymbolInstruction::Coil => {
            let after_inputs = class_columns(ElementClass::Input)
                .max()
                .map_or(0, |c| c + 1);
            (after_inputs..rung.width).rev().find(|&c| free(c))
        }
    }
}

/// Fügt das Commit-Event als Schließer bzw. Spule in den Strompfad ein.
pub fn place_symbol(state: &mut AppState, rung: RungId, commit: &SymbolCommit) -> anyhow::Result<()> {
    let target = state
        .program
        .rung(rung)
        .ok_or(EditError::RungNotFound(rung))?;
    let column = symbol_column(target, commit.instruction).ok_or(EditError::RungFull(rung))?;
    let kind = match commit.instruction {
        SymbolInstruction::Contact => ElementKind::NormallyOpen,
        SymbolInstruction::Coil => ElementKind::OutputEnergize,
    };

    log::debug!(
        "Symbol {:?} {} → Strompfad {} Spalte {}",
        commit.instruction,
        commit.device,
        rung,
        column
    );
    apply_edit(
        state,
        EditCommand::AddElement {
            rung,
            column,
            branch: None,
            kind,
            operands: vec![commit.device.clone()],
        },
    )
}
