use crate::app::{AppCommand, AppIntent, AppState, ProgramTemplate};
use crate::core::{EditCommand, LadderProgram};

use super::map_intent_to_commands;

fn sample_state() -> AppState {
    let mut state = AppState::new();
    state.replace_program(LadderProgram::sample());
    state
}

#[test]
fn save_requested_maps_to_save_project_without_path() {
    let state = AppState::new();

    let commands = map_intent_to_commands(&state, AppIntent::SaveRequested);

    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], AppCommand::SaveProject { path: None }));
}

#[test]
fn sample_requested_maps_to_template() {
    let state = AppState::new();

    let commands = map_intent_to_commands(&state, AppIntent::SampleProgramRequested);

    assert!(matches!(
        commands[0],
        AppCommand::LoadTemplate {
            template: ProgramTemplate::Sample
        }
    ));
}

#[test]
fn open_project_stops_free_run_before_loading() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::OpenProjectRequested {
            path: "projekt.json".into(),
        },
    );

    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], AppCommand::StopFreeRun));
    assert!(matches!(commands[1], AppCommand::LoadProject { .. }));
}

#[test]
fn add_rung_uses_configured_width() {
    let mut state = AppState::new();
    state.options.rung_width = 14;

    let commands = map_intent_to_commands(&state, AppIntent::AddRungRequested { index: None });

    assert!(matches!(
        commands[0],
        AppCommand::ApplyEdit {
            command: EditCommand::AddRung {
                index: None,
                width: 14
            }
        }
    ));
}

#[test]
fn move_rung_up_on_first_rung_is_noop() {
    let state = sample_state();
    let first = state.program.rungs[0].id;

    let commands = map_intent_to_commands(&state, AppIntent::MoveRungUpRequested { rung: first });

    assert!(commands.is_empty());
}

#[test]
fn move_rung_down_targets_next_index() {
    let state = sample_state();
    let first = state.program.rungs[0].id;

    let commands = map_intent_to_commands(&state, AppIntent::MoveRungDownRequested { rung: first });

    assert_eq!(commands.len(), 1);
    assert!(matches!(
        &commands[0],
        AppCommand::ApplyEdit {
            command: EditCommand::MoveRung { index: 1, .. }
        }
    ));
}

#[test]
fn move_element_left_at_column_zero_is_noop() {
    let state = sample_state();
    // Element 1: LD X0 in Spalte 0
    let commands =
        map_intent_to_commands(&state, AppIntent::MoveElementLeftRequested { element: 1 });

    assert!(commands.is_empty());
}

#[test]
fn move_element_right_targets_next_column() {
    let state = sample_state();

    let commands =
        map_intent_to_commands(&state, AppIntent::MoveElementRightRequested { element: 1 });

    assert!(matches!(
        &commands[0],
        AppCommand::ApplyEdit {
            command: EditCommand::MoveElement {
                element: 1,
                column: 1
            }
        }
    ));
}

#[test]
fn host_tick_is_ignored_while_stopped() {
    let mut state = AppState::new();

    let commands = map_intent_to_commands(&state, AppIntent::HostTick { elapsed_ms: 100 });
    assert!(commands.is_empty());

    state.simulation.start();
    let commands = map_intent_to_commands(&state, AppIntent::HostTick { elapsed_ms: 100 });
    assert!(matches!(
        commands[0],
        AppCommand::AdvanceFreeRun { elapsed_ms: 100 }
    ));
}

#[test]
fn symbol_entry_confirmed_maps_to_commit() {
    let state = AppState::new();

    let commands = map_intent_to_commands(&state, AppIntent::SymbolEntryConfirmed { rung: 3 });

    assert!(matches!(commands[0], AppCommand::CommitSymbolEntry { rung: 3 }));
}
