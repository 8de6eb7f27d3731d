//! Integrationstests für Projektdateien: Roundtrip, Migration alter Stände,
//! Ablehnung inkonsistenter oder unbekannter Dateien.

use plc_ladder_sim::app::{SymbolEntryPrefs, SymbolInstruction};
use plc_ladder_sim::persist::{self, CURRENT_VERSION};
use plc_ladder_sim::{
    AppController, AppIntent, AppState, LadderProgram, PersistError, PersistedProject, VarValue,
};
use serde_json::Value;

/// Beispielprojekt als JSON-Baum, zum gezielten Verfälschen vor dem Laden.
fn sample_json() -> Value {
    let project = PersistedProject::new(LadderProgram::sample(), SymbolEntryPrefs::default());
    let text = persist::to_json_string(&project).expect("Serialisierung");
    serde_json::from_str(&text).expect("JSON")
}

fn load_err(value: &Value) -> PersistError {
    persist::from_json_str(&value.to_string()).expect_err("Inkonsistente Datei")
}

fn rung_mut(value: &mut Value, index: usize) -> &mut Value {
    &mut value["program"]["rungs"][index]
}

#[test]
fn test_project_file_roundtrip_keeps_program_and_prefs() {
    let tmp = std::env::temp_dir().join("test_plc_ladder_roundtrip.json");
    let mut program = LadderProgram::sample();
    plc_ladder_sim::run_cycle(&mut program, 1);
    let prefs = SymbolEntryPrefs {
        instruction: SymbolInstruction::Coil,
        enter_symbol_continuously: true,
        enter_device_comment_continuously: false,
    };
    let project = PersistedProject::new(program, prefs);

    persist::save_project_file(&tmp, &project).expect("Speichern");
    let loaded = persist::load_project_file(&tmp).expect("Laden");
    let _ = std::fs::remove_file(&tmp);

    assert_eq!(loaded.version, CURRENT_VERSION);
    assert_eq!(loaded, project);
    let y0 = "Y0".parse().expect("Device");
    assert_eq!(loaded.program.variable(y0).expect("Y0").used_by.len(), 3);
}

#[test]
fn test_version_1_file_is_migrated_on_load() {
    let text = r#"{
        "version": 1,
        "program": {
            "variables": [
                { "name": "X0", "value": true },
                { "name": "Y0", "value": false }
            ],
            "rungs": [{
                "id": 1,
                "elements": [
                    {
                        "id": 1,
                        "type": "NormallyOpen",
                        "operands": ["X0"],
                        "position": { "rung": 1, "column": 0, "branch": null }
                    },
                    {
                        "id": 2,
                        "type": "OutputEnergize",
                        "operands": ["Y0"],
                        "position": { "rung": 1, "column": 9, "branch": null }
                    }
                ]
            }]
        }
    }"#;

    let mut project = persist::from_json_str(text).expect("Migration");

    assert_eq!(project.version, CURRENT_VERSION);
    assert_eq!(project.symbol_entry, SymbolEntryPrefs::default());
    assert_eq!(project.program.rungs[0].width, 10);

    let report = plc_ladder_sim::run_cycle(&mut project.program, 1);
    assert!(report.is_clean());
    let y0 = "Y0".parse().expect("Device");
    assert_eq!(project.program.value(y0), Some(VarValue::Bool(true)));
}

#[test]
fn test_future_version_is_rejected() {
    let text = r#"{ "version": 42, "program": { "variables": [], "rungs": [] } }"#;

    let err = persist::from_json_str(text).expect_err("Zu neue Version");

    assert!(matches!(
        err,
        PersistError::UnsupportedVersion {
            found: 42,
            current: CURRENT_VERSION
        }
    ));
}

#[test]
fn test_wrong_operand_count_is_rejected() {
    let text = r#"{
        "version": 3,
        "program": {
            "variables": [{ "name": "D0", "value": 0 }],
            "rungs": [{
                "id": 1,
                "width": 10,
                "elements": [{
                    "id": 1,
                    "kind": { "Math": "Add" },
                    "operands": ["D0"],
                    "position": { "rung": 1, "column": 9, "branch": null }
                }],
                "branches": []
            }]
        }
    }"#;

    let err = persist::from_json_str(text).expect_err("Zu wenige Operanden");

    assert!(matches!(err, PersistError::Inconsistent(_)));
}

#[test]
fn test_invalid_json_is_a_json_error() {
    let err = persist::from_json_str("{ not json").expect_err("Kein JSON");
    assert!(matches!(err, PersistError::Json(_)));
}

#[test]
fn test_save_and_open_through_controller() {
    let tmp = std::env::temp_dir().join("test_plc_ladder_controller.json");
    let mut controller = AppController::new();
    let mut state = AppState::new();
    controller
        .handle_intent(&mut state, AppIntent::SampleProgramRequested)
        .expect("Beispielprogramm");
    controller
        .handle_intent(&mut state, AppIntent::SymbolContinuousToggled { enabled: true })
        .expect("Option");
    controller
        .handle_intent(&mut state, AppIntent::SaveAsRequested { path: tmp.clone() })
        .expect("Speichern");
    assert_eq!(state.project_path.as_deref(), Some(tmp.as_path()));
    assert!(!state.dirty);

    let mut reopened = AppState::new();
    controller
        .handle_intent(&mut reopened, AppIntent::OpenProjectRequested { path: tmp.clone() })
        .expect("Öffnen");
    let _ = std::fs::remove_file(&tmp);

    assert_eq!(reopened.program, state.program);
    assert!(reopened.symbol_entry.enter_symbol_continuously);
    assert!(!reopened.can_undo());
}

#[test]
fn test_unmodified_sample_json_loads() {
    let project = persist::from_json_str(&sample_json().to_string()).expect("Laden");
    assert_eq!(project.program, LadderProgram::sample());
}

#[test]
fn test_element_column_beyond_rung_width_is_rejected() {
    let mut value = sample_json();
    // Strompfad 6: OUT Y1 @9
    rung_mut(&mut value, 5)["elements"][1]["position"]["column"] = 42.into();

    assert!(matches!(load_err(&value), PersistError::Inconsistent(_)));
}

#[test]
fn test_branch_past_rung_width_is_rejected() {
    let mut value = sample_json();
    rung_mut(&mut value, 0)["branches"][0]["end_column"] = 50.into();

    assert!(matches!(load_err(&value), PersistError::Inconsistent(_)));
}

#[test]
fn test_partially_overlapping_branches_are_rejected() {
    let mut value = sample_json();
    let overlapping = serde_json::json!({
        "id": 2,
        "start_column": 0,
        "end_column": 3,
        "elements": []
    });
    rung_mut(&mut value, 0)["branches"]
        .as_array_mut()
        .expect("Verzweigungen")
        .push(overlapping);

    assert!(matches!(load_err(&value), PersistError::Inconsistent(_)));
}

#[test]
fn test_branch_element_with_wrong_branch_position_is_rejected() {
    let mut value = sample_json();
    rung_mut(&mut value, 0)["branches"][0]["elements"][0]["position"]["branch"] = Value::Null;

    assert!(matches!(load_err(&value), PersistError::Inconsistent(_)));
}

#[test]
fn test_duplicate_rung_id_is_rejected() {
    let mut value = sample_json();
    rung_mut(&mut value, 1)["id"] = 1.into();
    for element in rung_mut(&mut value, 1)["elements"]
        .as_array_mut()
        .expect("Elemente")
    {
        element["position"]["rung"] = 1.into();
    }

    assert!(matches!(load_err(&value), PersistError::Inconsistent(_)));
}

#[test]
fn test_variable_value_of_wrong_type_is_rejected() {
    let mut value = sample_json();
    let x3 = value["program"]["variables"]
        .as_array_mut()
        .expect("Variablen")
        .iter_mut()
        .find(|v| v["name"] == "X3")
        .expect("X3");
    x3["value"] = 7.into();

    assert!(matches!(load_err(&value), PersistError::Inconsistent(_)));
}
