use super::{run, sample_state};
use plc_ladder_sim::core::{ElementKind, MathOp, RungId};
use plc_ladder_sim::{AppController, AppIntent, AppState, DeviceRef, FaultKind, VarValue};

fn device(text: &str) -> DeviceRef {
    text.parse().expect("gültiges Device")
}

fn force(controller: &mut AppController, state: &mut AppState, device: &str, value: VarValue) {
    run(
        controller,
        state,
        AppIntent::SetVariableValueRequested {
            device: device.into(),
            value,
        },
    );
}

fn add(
    controller: &mut AppController,
    state: &mut AppState,
    rung: RungId,
    column: u16,
    kind: ElementKind,
    operands: &[&str],
) {
    run(
        controller,
        state,
        AppIntent::AddElementRequested {
            rung,
            column,
            branch: None,
            kind,
            operands: operands.iter().map(|s| s.to_string()).collect(),
        },
    );
}

/// Programm mit einem einzigen `DIV D1 D2 D3` (D2 = 0).
fn divide_by_zero_state(controller: &mut AppController) -> AppState {
    let mut state = AppState::new();
    run(controller, &mut state, AppIntent::AddRungRequested { index: None });
    let rung = state.program.rungs[0].id;
    add(controller, &mut state, rung, 9, ElementKind::Math(MathOp::Div), &["D1", "D2", "D3"]);
    state
}

#[test]
fn test_contact_drives_coil_in_one_cycle() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    run(&mut controller, &mut state, AppIntent::AddRungRequested { index: None });
    let rung = state.program.rungs[0].id;
    add(&mut controller, &mut state, rung, 0, ElementKind::NormallyOpen, &["X1"]);
    add(&mut controller, &mut state, rung, 9, ElementKind::OutputEnergize, &["Y1"]);

    force(&mut controller, &mut state, "X1", VarValue::Bool(true));
    run(&mut controller, &mut state, AppIntent::CycleScanRequested);
    assert_eq!(state.program.value(device("Y1")), Some(VarValue::Bool(true)));

    force(&mut controller, &mut state, "X1", VarValue::Bool(false));
    run(&mut controller, &mut state, AppIntent::CycleScanRequested);
    assert_eq!(state.program.value(device("Y1")), Some(VarValue::Bool(false)));
    assert_eq!(state.simulation.cycle_count, 2);
}

#[test]
fn test_sample_motor_latches_and_stops() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    force(&mut controller, &mut state, "X0", VarValue::Bool(true));
    run(&mut controller, &mut state, AppIntent::CycleScanRequested);
    assert_eq!(state.program.value(device("Y0")), Some(VarValue::Bool(true)));

    // Selbsthaltung über den Parallelzweig
    force(&mut controller, &mut state, "X0", VarValue::Bool(false));
    run(&mut controller, &mut state, AppIntent::CycleScanRequested);
    assert_eq!(state.program.value(device("Y0")), Some(VarValue::Bool(true)));

    force(&mut controller, &mut state, "X1", VarValue::Bool(true));
    run(&mut controller, &mut state, AppIntent::CycleScanRequested);
    assert_eq!(state.program.value(device("Y0")), Some(VarValue::Bool(false)));
}

#[test]
fn test_scan_cycle_is_not_an_undo_step() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);
    force(&mut controller, &mut state, "X0", VarValue::Bool(true));
    let undo_len = state.history.undo_len();

    run(&mut controller, &mut state, AppIntent::CycleScanRequested);

    assert_eq!(state.history.undo_len(), undo_len);
}

#[test]
fn test_divide_by_zero_is_reported_and_cycle_completes() {
    let mut controller = AppController::new();
    let mut state = divide_by_zero_state(&mut controller);

    run(&mut controller, &mut state, AppIntent::CycleScanRequested);

    let report = state.simulation.last_report.as_ref().expect("Zyklusbericht");
    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.faults[0].kind, FaultKind::DivideByZero);
    assert_eq!(state.program.value(device("D3")), Some(VarValue::Int(0)));
    assert_eq!(state.simulation.fault_summary().len(), 1);
}

#[test]
fn test_host_tick_runs_due_cycles() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    // Ohne Free-Run kein Zyklus
    run(&mut controller, &mut state, AppIntent::HostTick { elapsed_ms: 250 });
    assert_eq!(state.simulation.cycle_count, 0);

    run(&mut controller, &mut state, AppIntent::StartSimulationRequested);
    run(&mut controller, &mut state, AppIntent::HostTick { elapsed_ms: 250 });
    assert_eq!(state.simulation.cycle_count, 2);

    // Rest von 50 ms wird mitgenommen
    run(&mut controller, &mut state, AppIntent::HostTick { elapsed_ms: 50 });
    assert_eq!(state.simulation.cycle_count, 3);

    run(&mut controller, &mut state, AppIntent::StopSimulationRequested);
    assert!(!state.simulation.is_running());
}

#[test]
fn test_edit_while_running_is_deferred_to_cycle_end() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);
    run(&mut controller, &mut state, AppIntent::StartSimulationRequested);

    run(&mut controller, &mut state, AppIntent::AddRungRequested { index: None });
    assert_eq!(state.rung_count(), 6);
    assert_eq!(state.simulation.pending_len(), 1);

    run(&mut controller, &mut state, AppIntent::HostTick { elapsed_ms: 100 });
    assert_eq!(state.rung_count(), 7);
    assert_eq!(state.simulation.pending_len(), 0);
    assert!(state.can_undo());
}

#[test]
fn test_pending_edits_are_applied_on_stop() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);
    run(&mut controller, &mut state, AppIntent::StartSimulationRequested);

    run(&mut controller, &mut state, AppIntent::DeleteRungRequested { rung: 6 });
    assert_eq!(state.rung_count(), 6);

    run(&mut controller, &mut state, AppIntent::StopSimulationRequested);
    assert_eq!(state.rung_count(), 5);
    assert_eq!(state.simulation.cycle_count, 0);
}

#[test]
fn test_invalid_edit_while_running_fails_immediately() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);
    run(&mut controller, &mut state, AppIntent::StartSimulationRequested);

    let result = controller.handle_intent(&mut state, AppIntent::DeleteRungRequested { rung: 42 });

    assert!(result.is_err());
    assert_eq!(state.simulation.pending_len(), 0);
}

#[test]
fn test_stop_on_fault_halts_free_run() {
    let mut controller = AppController::new();
    let mut state = divide_by_zero_state(&mut controller);
    let mut options = state.options.clone();
    options.stop_on_fault = true;
    run(&mut controller, &mut state, AppIntent::OptionsChanged { options });

    run(&mut controller, &mut state, AppIntent::StartSimulationRequested);
    run(&mut controller, &mut state, AppIntent::HostTick { elapsed_ms: 500 });

    assert_eq!(state.simulation.cycle_count, 1);
    assert!(!state.simulation.is_running());
}

#[test]
fn test_loading_program_stops_free_run() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);
    run(&mut controller, &mut state, AppIntent::StartSimulationRequested);
    run(&mut controller, &mut state, AppIntent::HostTick { elapsed_ms: 100 });

    run(&mut controller, &mut state, AppIntent::NewProgramRequested);

    assert!(!state.simulation.is_running());
    assert_eq!(state.simulation.cycle_count, 0);
    assert_eq!(state.rung_count(), 0);
}
