//! Integrationstests für Patch-basiertes Editing:
//! - Undo stellt das Programm exakt wieder her (Struktur und Serialisierung)
//! - Redo nach Undo reproduziert den Zustand nach der Bearbeitung
//! - Forcen nach einem Scan-Zyklus bleibt rückgängig machbar

use plc_ladder_sim::core::{CompareOp, ElementKind};
use plc_ladder_sim::{
    plan, run_cycle, EditCommand, EditHistory, LadderProgram, Patch, VarValue,
};

fn json(program: &LadderProgram) -> String {
    serde_json::to_string(program).expect("Serialisierung")
}

/// Ein Befehl je Bearbeitungsart, jeweils gültig auf dem Beispielprogramm.
fn one_command_per_kind() -> Vec<EditCommand> {
    vec![
        EditCommand::AddRung {
            index: Some(0),
            width: 10,
        },
        EditCommand::DeleteRung { rung: 1 },
        EditCommand::MoveRung { rung: 6, index: 0 },
        EditCommand::AddBranch {
            rung: 2,
            start_column: 0,
            end_column: 1,
        },
        EditCommand::DeleteBranch { rung: 1, branch: 1 },
        EditCommand::AddElement {
            rung: 2,
            column: 1,
            branch: None,
            kind: ElementKind::NormallyClosed,
            operands: vec!["X7".into()],
        },
        EditCommand::DropElement {
            rung: 1,
            column: 0,
            branch: None,
            kind: ElementKind::NormallyOpen,
            operands: vec!["X5".into()],
        },
        EditCommand::DeleteElement { element: 3 },
        EditCommand::MoveElement {
            element: 2,
            column: 4,
        },
        EditCommand::SetOperand {
            element: 13,
            pin: 1,
            text: "D7".into(),
        },
        EditCommand::AddVariable {
            device: "D9".into(),
        },
        EditCommand::RenameVariable {
            from: "X0".into(),
            to: "X20".into(),
        },
        EditCommand::SetVariableValue {
            device: "D0".into(),
            value: VarValue::Int(7),
        },
    ]
}

#[test]
fn test_undo_restores_program_for_every_edit_kind() {
    for command in one_command_per_kind() {
        let mut program = LadderProgram::sample();
        let before = program.clone();
        let mut history: EditHistory<Patch> = EditHistory::default();

        let patch = plan(&program, &command)
            .unwrap_or_else(|e| panic!("{command:?} abgelehnt: {e}"));
        assert!(!patch.is_empty(), "{command:?} ohne Änderung");
        history
            .apply(&mut program, command.label(), patch)
            .expect("Patch anwenden");
        assert_ne!(program, before, "{command:?} hat nichts verändert");
        let after = program.clone();

        history.undo(&mut program).expect("Undo");
        assert_eq!(program, before, "Undo von {command:?}");
        assert_eq!(json(&program), json(&before), "Undo von {command:?} (JSON)");

        history.redo(&mut program).expect("Redo");
        assert_eq!(program, after, "Redo von {command:?}");
    }
}

#[test]
fn test_full_undo_chain_returns_to_start() {
    let mut program = LadderProgram::sample();
    let start = program.clone();
    let mut history: EditHistory<Patch> = EditHistory::default();

    let commands = [
        EditCommand::AddRung {
            index: None,
            width: 10,
        },
        EditCommand::AddElement {
            rung: 7,
            column: 0,
            branch: None,
            kind: ElementKind::Compare(CompareOp::Les),
            operands: vec!["D0".into(), "K10".into(), "M5".into()],
        },
        EditCommand::AddElement {
            rung: 7,
            column: 9,
            branch: None,
            kind: ElementKind::OutputLatch,
            operands: vec!["Y3".into()],
        },
        EditCommand::AddBranch {
            rung: 7,
            start_column: 0,
            end_column: 1,
        },
        EditCommand::AddElement {
            rung: 7,
            column: 0,
            branch: Some(2),
            kind: ElementKind::NormallyOpen,
            operands: vec!["M5".into()],
        },
        EditCommand::MoveRung { rung: 7, index: 0 },
        EditCommand::DeleteRung { rung: 3 },
    ];
    for command in &commands {
        let patch = plan(&program, command).unwrap_or_else(|e| panic!("{command:?}: {e}"));
        history
            .apply(&mut program, command.label(), patch)
            .expect("Patch anwenden");
    }
    assert_eq!(history.undo_len(), commands.len());

    while history.can_undo() {
        history.undo(&mut program).expect("Undo");
    }

    assert_eq!(program, start);
    assert_eq!(json(&program), json(&start));
}

#[test]
fn test_force_after_scan_is_still_undoable() {
    let mut program = LadderProgram::sample();
    let mut history: EditHistory<Patch> = EditHistory::default();

    let force = EditCommand::SetVariableValue {
        device: "X0".into(),
        value: VarValue::Bool(true),
    };
    let patch = plan(&program, &force).expect("Forcen");
    history
        .apply(&mut program, force.label(), patch)
        .expect("Patch anwenden");

    // Der Scan schreibt Y0, die History bleibt davon unberührt
    run_cycle(&mut program, 1);
    assert_eq!(history.undo_len(), 1);

    history.undo(&mut program).expect("Undo");
    let x0 = "X0".parse().expect("Device");
    assert_eq!(program.value(x0), Some(VarValue::Bool(false)));
    let y0 = "Y0".parse().expect("Device");
    assert_eq!(program.value(y0), Some(VarValue::Bool(true)));
}

#[test]
fn test_new_edit_after_undo_drops_redo() {
    let mut program = LadderProgram::sample();
    let mut history: EditHistory<Patch> = EditHistory::default();

    for device in ["D10", "D11"] {
        let command = EditCommand::AddVariable {
            device: device.into(),
        };
        let patch = plan(&program, &command).expect("Planung");
        history
            .apply(&mut program, command.label(), patch)
            .expect("Patch anwenden");
    }
    history.undo(&mut program).expect("Undo");
    assert!(history.can_redo());

    let command = EditCommand::AddVariable {
        device: "D12".into(),
    };
    let patch = plan(&program, &command).expect("Planung");
    history
        .apply(&mut program, command.label(), patch)
        .expect("Patch anwenden");

    assert!(!history.can_redo());
    assert!(program.variable("D11".parse().expect("Device")).is_none());
}

#[test]
fn test_delete_rung_then_undo_keeps_variable_back_references() {
    let mut program = LadderProgram::sample();
    let mut history: EditHistory<Patch> = EditHistory::default();
    let y0 = "Y0".parse().expect("Device");
    let used_before = program.variable(y0).expect("Y0").used_by.clone();

    let command = EditCommand::DeleteRung { rung: 1 };
    let patch = plan(&program, &command).expect("Planung");
    history
        .apply(&mut program, command.label(), patch)
        .expect("Patch anwenden");
    assert_eq!(program.variable(y0).expect("Y0").used_by.len(), 1);

    history.undo(&mut program).expect("Undo");
    assert_eq!(program.variable(y0).expect("Y0").used_by, used_before);
}
