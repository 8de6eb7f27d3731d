use super::{run, sample_state};
use plc_ladder_sim::app::SymbolInstruction;
use plc_ladder_sim::core::{DeviceError, ElementKind, Operand};
use plc_ladder_sim::{AppController, AppIntent, DeviceRef, EditError, SymbolCommit};

fn device(text: &str) -> DeviceRef {
    text.parse().expect("gültiges Device")
}

#[test]
fn test_invalid_keystroke_sets_error_without_failing() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    run(
        &mut controller,
        &mut state,
        AppIntent::SymbolEntryOpened {
            instruction: SymbolInstruction::Contact,
        },
    );
    run(&mut controller, &mut state, AppIntent::SymbolDeviceTextChanged { text: "x1".into() });
    run(&mut controller, &mut state, AppIntent::SymbolDeviceTextChanged { text: "x1a".into() });

    assert_eq!(state.symbol_entry.device_text, "X1");
    assert_eq!(state.symbol_entry.device_error, Some(DeviceError::NonDigitSuffix));

    // OK mit offenem Fehler platziert nichts
    let before = state.element_count();
    run(&mut controller, &mut state, AppIntent::SymbolEntryConfirmed { rung: 1 });
    assert_eq!(state.element_count(), before);
    assert!(state.symbol_entry.is_open);
}

#[test]
fn test_confirmed_contact_lands_before_output_stage() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    run(
        &mut controller,
        &mut state,
        AppIntent::SymbolEntryOpened {
            instruction: SymbolInstruction::Contact,
        },
    );
    run(&mut controller, &mut state, AppIntent::SymbolDeviceTextChanged { text: "x5".into() });
    run(&mut controller, &mut state, AppIntent::SymbolEntryConfirmed { rung: 1 });

    let placed = state.program.element(15).expect("neues Element");
    assert_eq!(placed.kind, ElementKind::NormallyOpen);
    assert_eq!(placed.position.rung, 1);
    assert_eq!(placed.position.column, 2);
    assert_eq!(placed.operands, vec![Operand::Device(device("X5"))]);
    assert!(state.program.variable(device("X5")).is_some());

    assert!(!state.symbol_entry.is_open);
    assert!(state.symbol_entry.device_text.is_empty());
}

#[test]
fn test_continuous_entry_places_coil_and_stays_open() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    run(&mut controller, &mut state, AppIntent::SymbolContinuousToggled { enabled: true });
    run(
        &mut controller,
        &mut state,
        AppIntent::SymbolEntryOpened {
            instruction: SymbolInstruction::Coil,
        },
    );
    run(&mut controller, &mut state, AppIntent::SymbolDeviceTextChanged { text: "y5".into() });
    run(&mut controller, &mut state, AppIntent::SymbolEntryConfirmed { rung: 1 });

    let placed = state.program.element(15).expect("neues Element");
    assert_eq!(placed.kind, ElementKind::OutputEnergize);
    assert_eq!(placed.position.column, 8);
    assert!(state.symbol_entry.is_open);
    assert!(state.symbol_entry.device_text.is_empty());
}

#[test]
fn test_external_commit_event_is_placed() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    run(
        &mut controller,
        &mut state,
        AppIntent::SymbolCommitted {
            rung: 4,
            commit: SymbolCommit {
                instruction: SymbolInstruction::Contact,
                device: "M9".into(),
            },
        },
    );

    // Strompfad 4: LD X3 @0, RES C0 @9
    let placed = state.program.element(15).expect("neues Element");
    assert_eq!(placed.position.column, 1);
    assert!(state.can_undo());
}

#[test]
fn test_commit_into_unknown_rung_is_rejected() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    let err = controller
        .handle_intent(
            &mut state,
            AppIntent::SymbolCommitted {
                rung: 99,
                commit: SymbolCommit {
                    instruction: SymbolInstruction::Coil,
                    device: "Y5".into(),
                },
            },
        )
        .expect_err("Unbekannter Strompfad");

    assert_eq!(err.downcast_ref::<EditError>(), Some(&EditError::RungNotFound(99)));
}

#[test]
fn test_closed_entry_discards_text() {
    let mut controller = AppController::new();
    let mut state = sample_state(&mut controller);

    run(
        &mut controller,
        &mut state,
        AppIntent::SymbolEntryOpened {
            instruction: SymbolInstruction::Contact,
        },
    );
    run(&mut controller, &mut state, AppIntent::SymbolDeviceTextChanged { text: "x5".into() });
    run(&mut controller, &mut state, AppIntent::SymbolEntryClosed);
    run(&mut controller, &mut state, AppIntent::SymbolEntryConfirmed { rung: 1 });

    assert_eq!(state.element_count(), 14);
}
