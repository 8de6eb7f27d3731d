use super::{run, sample_state};
use plc_ladder_sim::core::{DeviceError, ElementKind, Operand};
use plc_ladder_sim::{
    AppController, AppIntent, AppState, DeviceRef, EditError, LadderProgram, VarValue,
};

fn device(text: &str) -> DeviceRef {
    text.parse().expect("gültiges Device")
}

fn edit_error(result: anyhow::Result<()>) -> EditError {
    let err = result.expect_err("Bearbeitung sollte abgelehnt werden");
    err.downcast_ref::<EditError>()
        .cloned()
        .unwrap_or_else(|| panic!("Kein EditError: {err}"))
}

#[test]
fn test_add_element_creates_variables_and_is_undoable() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    run(&mut controller, &mut state, AppIntent::AddRungRequested { index: None });
    let rung = state.program.rungs[0].id;
    run(
        &mut controller,
        &mut state,
        AppIntent::AddElementRequested {
            rung,
            column: 0,
            branch: None,
            kind: ElementKind::NormallyOpen,
            operands: vec!["x1".into()],
        },
    );

    let x1 = state.program.variable(device("X1")).expect("X1 angelegt");
    assert_eq!(x1.used_by.len(), 1);
    assert!(state.dirty);

    run(&mut controller, &mut state, AppIntent::UndoRequested);
    assert_eq!(state.element_count(), 0);
    assert!(state.program.variable(device("X1")).is_none());
}

#[test]
fn test_add_element_with_invalid_device_is_rejected() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);
    let before = state.program.clone();

    let err = edit_error(controller.handle_intent(
        &mut state,
        AppIntent::AddElementRequested {
            rung: 1,
            column: 5,
            branch: None,
            kind: ElementKind::NormallyOpen,
            operands: vec!["Q5".into()],
        },
    ));

    assert!(matches!(
        err,
        EditError::InvalidDevice {
            source: DeviceError::InvalidPrefix { .. },
            ..
        }
    ));
    assert_eq!(state.program, before);
}

#[test]
fn test_add_element_on_occupied_slot_is_rejected() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    let err = edit_error(controller.handle_intent(
        &mut state,
        AppIntent::AddElementRequested {
            rung: 1,
            column: 0,
            branch: None,
            kind: ElementKind::NormallyOpen,
            operands: vec!["X5".into()],
        },
    ));

    assert_eq!(err, EditError::SlotOccupied { rung: 1, column: 0 });
}

#[test]
fn test_drop_element_shifts_contiguous_block() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    run(
        &mut controller,
        &mut state,
        AppIntent::ElementDropped {
            rung: 1,
            column: 0,
            branch: None,
            kind: ElementKind::NormallyOpen,
            operands: vec!["X5".into()],
        },
    );

    let column = |id| state.program.element(id).expect("Element").position.column;
    assert_eq!(column(15), 0);
    assert_eq!(column(1), 1);
    assert_eq!(column(2), 2);
    assert_eq!(column(3), 9);

    run(&mut controller, &mut state, AppIntent::UndoRequested);
    assert_eq!(state.program, LadderProgram::sample());
}

#[test]
fn test_delete_element_keeps_unreferenced_variable() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    // Element 9: LD X3
    run(&mut controller, &mut state, AppIntent::DeleteElementRequested { element: 9 });

    let x3 = state.program.variable(device("X3")).expect("X3 bleibt bestehen");
    assert!(x3.used_by.is_empty());

    run(
        &mut controller,
        &mut state,
        AppIntent::DeleteVariableRequested { device: "X3".into() },
    );
    assert!(state.program.variable(device("X3")).is_none());
}

#[test]
fn test_delete_referenced_variable_is_rejected() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    let err = edit_error(controller.handle_intent(
        &mut state,
        AppIntent::DeleteVariableRequested { device: "Y0".into() },
    ));

    assert_eq!(
        err,
        EditError::VariableInUse {
            device: device("Y0"),
            count: 3
        }
    );
}

#[test]
fn test_timer_accumulator_is_read_only() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    let err = edit_error(controller.handle_intent(
        &mut state,
        AppIntent::SetVariableValueRequested {
            device: "T0".into(),
            value: VarValue::Int(5),
        },
    ));

    assert_eq!(err, EditError::ReadOnlyVariable(device("T0")));
}

#[test]
fn test_rename_variable_rewrites_operands() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    run(
        &mut controller,
        &mut state,
        AppIntent::RenameVariableRequested {
            from: "X0".into(),
            to: "x10".into(),
        },
    );

    let element = state.program.element(1).expect("Element 1");
    assert_eq!(element.operands[0], Operand::Device(device("X10")));
    assert!(state.program.variable(device("X0")).is_none());
}

#[test]
fn test_move_rung_down_and_up() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    run(&mut controller, &mut state, AppIntent::MoveRungDownRequested { rung: 1 });
    assert_eq!(state.program.rung_index(1), Some(1));

    run(&mut controller, &mut state, AppIntent::MoveRungUpRequested { rung: 1 });
    assert_eq!(state.program.rung_index(1), Some(0));
    assert_eq!(state.history.undo_len(), 2);
}

#[test]
fn test_move_element_right_and_left() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    // Element 2: LDI X1 in Spalte 1
    run(&mut controller, &mut state, AppIntent::MoveElementRightRequested { element: 2 });
    assert_eq!(state.program.element(2).expect("Element").position.column, 2);

    run(&mut controller, &mut state, AppIntent::MoveElementLeftRequested { element: 2 });
    assert_eq!(state.program.element(2).expect("Element").position.column, 1);
}

#[test]
fn test_assign_parameter_accepts_constant_on_preset() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    // Element 6: TON K30 T0 M0
    run(
        &mut controller,
        &mut state,
        AppIntent::AssignParameterRequested {
            element: 6,
            pin: 0,
            text: "K50".into(),
        },
    );
    assert_eq!(
        state.program.element(6).expect("Element").operands[0],
        Operand::Constant(50)
    );

    let err = edit_error(controller.handle_intent(
        &mut state,
        AppIntent::AssignParameterRequested {
            element: 6,
            pin: 2,
            text: "K1".into(),
        },
    ));
    assert!(matches!(err, EditError::OperandTypeMismatch { .. }));
}

#[test]
fn test_undo_redo_on_empty_stacks_are_noops() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);
    let before = state.program.clone();

    run(&mut controller, &mut state, AppIntent::UndoRequested);
    run(&mut controller, &mut state, AppIntent::RedoRequested);

    assert_eq!(state.program, before);
}
