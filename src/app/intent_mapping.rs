//! Mapping von UI-Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, AppState, ProgramTemplate};
use crate::core::EditCommand;

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::NewProgramRequested => vec![AppCommand::LoadTemplate {
            template: ProgramTemplate::Empty,
        }],
        AppIntent::SampleProgramRequested => vec![AppCommand::LoadTemplate {
            template: ProgramTemplate::Sample,
        }],
        AppIntent::OpenProjectRequested { path } => vec![
            AppCommand::StopFreeRun,
            AppCommand::LoadProject { path },
        ],
        AppIntent::SaveRequested => vec![AppCommand::SaveProject { path: None }],
        AppIntent::SaveAsRequested { path } => vec![AppCommand::SaveProject { path: Some(path) }],
        AppIntent::OptionsChanged { options } => vec![AppCommand::ApplyOptions { options }],

        AppIntent::AddRungRequested { index } => edit(EditCommand::AddRung {
            index,
            width: state.options.rung_width,
        }),
        AppIntent::DeleteRungRequested { rung } => edit(EditCommand::DeleteRung { rung }),
        AppIntent::MoveRungUpRequested { rung } => match state.program.rung_index(rung) {
            Some(index) if index > 0 => edit(EditCommand::MoveRung {
                rung,
                index: index - 1,
            }),
            Some(_) => Vec::new(),
            // Unbekannter Strompfad: Planung meldet RungNotFound
            None => edit(EditCommand::MoveRung { rung, index: 0 }),
        },
        AppIntent::MoveRungDownRequested { rung } => match state.program.rung_index(rung) {
            Some(index) if index + 1 < state.program.rung_count() => edit(EditCommand::MoveRung {
                rung,
                index: index + 1,
            }),
            Some(_) => Vec::new(),
            None => edit(EditCommand::MoveRung { rung, index: 0 }),
        },
        AppIntent::AddBranchRequested {
            rung,
            start_column,
            end_column,
        } => edit(EditCommand::AddBranch {
            rung,
            start_column,
            end_column,
        }),
        AppIntent::DeleteBranchRequested { rung, branch } => {
            edit(EditCommand::DeleteBranch { rung, branch })
        }

        AppIntent::AddElementRequested {
            rung,
            column,
            branch,
            kind,
            operands,
        } => edit(EditCommand::AddElement {
            rung,
            column,
            branch,
            kind,
            operands,
        }),
        AppIntent::ElementDropped {
            rung,
            column,
            branch,
            kind,
            operands,
        } => edit(EditCommand::DropElement {
            rung,
            column,
            branch,
            kind,
            operands,
        }),
        AppIntent::DeleteElementRequested { element } => {
            edit(EditCommand::DeleteElement { element })
        }
        AppIntent::MoveElementLeftRequested { element } => {
            match state.program.element(element).map(|e| e.position.column) {
                Some(0) => Vec::new(),
                Some(column) => edit(EditCommand::MoveElement {
                    element,
                    column: column - 1,
                }),
                None => edit(EditCommand::MoveElement { element, column: 0 }),
            }
        }
        AppIntent::MoveElementRightRequested { element } => {
            match state.program.element(element).map(|e| e.position.column) {
                Some(column) => edit(EditCommand::MoveElement {
                    element,
                    column: column.saturating_add(1),
                }),
                None => edit(EditCommand::MoveElement { element, column: 0 }),
            }
        }
        AppIntent::AssignParameterRequested { element, pin, text } => {
            edit(EditCommand::SetOperand { element, pin, text })
        }

        AppIntent::AddVariableRequested { device } => edit(EditCommand::AddVariable { device }),
        AppIntent::DeleteVariableRequested { device } => {
            edit(EditCommand::DeleteVariable { device })
        }
        AppIntent::RenameVariableRequested { from, to } => {
            edit(EditCommand::RenameVariable { from, to })
        }
        AppIntent::SetVariableValueRequested { device, value } => {
            edit(EditCommand::SetVariableValue { device, value })
        }

        AppIntent::UndoRequested => vec![AppCommand::Undo],
        AppIntent::RedoRequested => vec![AppCommand::Redo],

        AppIntent::CycleScanRequested => vec![AppCommand::RunScanCycle],
        AppIntent::StartSimulationRequested => vec![AppCommand::StartFreeRun],
        AppIntent::StopSimulationRequested => vec![AppCommand::StopFreeRun],
        AppIntent::HostTick { elapsed_ms } => {
            if state.simulation.is_running() {
                vec![AppCommand::AdvanceFreeRun { elapsed_ms }]
            } else {
                Vec::new()
            }
        }
        AppIntent::CheckProgramRequested => vec![AppCommand::CheckProgram],

        AppIntent::SymbolEntryOpened { instruction } => {
            vec![AppCommand::OpenSymbolEntry { instruction }]
        }
        AppIntent::SymbolDeviceTextChanged { text } => {
            vec![AppCommand::SetSymbolDeviceText { text }]
        }
        AppIntent::SymbolInstructionChanged { instruction } => {
            vec![AppCommand::SetSymbolInstruction { instruction }]
        }
        AppIntent::SymbolContinuousToggled { enabled } => {
            vec![AppCommand::SetSymbolContinuous { enabled }]
        }
        AppIntent::DeviceCommentContinuousToggled { enabled } => {
            vec![AppCommand::SetDeviceCommentContinuous { enabled }]
        }
        AppIntent::SymbolEntryClosed => vec![AppCommand::CloseSymbolEntry],
        AppIntent::SymbolEntryConfirmed { rung } => vec![AppCommand::CommitSymbolEntry { rung }],
        AppIntent::SymbolCommitted { rung, commit } => {
            vec![AppCommand::PlaceSymbol { rung, commit }]
        }
    }
}

fn edit(command: EditCommand) -> Vec<AppCommand> {
    vec![AppCommand::ApplyEdit { command }]
}

#[cfg(test)]
mod tests;
