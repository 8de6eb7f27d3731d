//! Geordnete Schema-Migrationen auf dem rohen JSON.
//!
//! - 1 → 2: Elementfeld `type` heißt `kind`
//! - 2 → 3: Strompfade tragen `width` und `branches`, Projekt trägt `symbol_entry`

use super::{PersistError, CURRENT_VERSION};
use crate::core::DEFAULT_RUNG_WIDTH;
use serde_json::{json, Map, Value};

type Step = fn(&mut Map<String, Value>) -> Result<(), String>;

/// Migrationsschritte, Index 0 migriert von Version 1 nach 2.
const STEPS: [Step; 2] = [v1_to_v2, v2_to_v3];

/// Hebt ein Projekt-JSON auf [`CURRENT_VERSION`].
pub fn migrate(mut raw: Value) -> Result<Value, PersistError> {
    let root = raw.as_object_mut().ok_or(PersistError::MissingVersion)?;
    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(PersistError::MissingVersion)?;
    if version == 0 || version > CURRENT_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: version,
            current: CURRENT_VERSION,
        });
    }

    for from in version..CURRENT_VERSION {
        let step = STEPS[(from - 1) as usize];
        step(root).map_err(|reason| PersistError::Migration { from, reason })?;
        root.insert("version".into(), json!(from + 1));
        log::info!("Projekt migriert: Version {} → {}", from, from + 1);
    }
    Ok(raw)
}

/// Wendet `f` auf jedes Element im Hauptpfad jedes Strompfads an.
fn for_each_element(
    root: &mut Map<String, Value>,
    mut f: impl FnMut(&mut Map<String, Value>),
) -> Result<(), String> {
    let rungs = root
        .get_mut("program")
        .and_then(|p| p.get_mut("rungs"))
        .and_then(Value::as_array_mut)
        .ok_or("program.rungs missing")?;
    for rung in rungs {
        let Some(elements) = rung.get_mut("elements").and_then(Value::as_array_mut) else {
            continue;
        };
        for element in elements {
            let element = element.as_object_mut().ok_or("element is not an object")?;
            f(element);
        }
    }
    Ok(())
}

fn v1_to_v2(root: &mut Map<String, Value>) -> Result<(), String> {
    // Vor Version 3 gab es keine Verzweigungen
    for_each_element(root, |element| {
        if let Some(kind) = element.remove("type") {
            element.insert("kind".into(), kind);
        }
    })
}

fn v2_to_v3(root: &mut Map<String, Value>) -> Result<(), String> {
    let rungs = root
        .get_mut("program")
        .and_then(|p| p.get_mut("rungs"))
        .and_then(Value::as_array_mut)
        .ok_or("program.rungs missing")?;
    for rung in rungs {
        let rung = rung.as_object_mut().ok_or("rung is not an object")?;
        rung.entry("width").or_insert(json!(DEFAULT_RUNG_WIDTH));
        rung.entry("branches").or_insert(json!([]));
    }
    root.entry("symbol_entry").or_insert(json!({
        "instruction": "contact",
        "enter_symbol_continuously": false,
        "enter_device_comment_continuously": false,
    }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_renames_type_and_adds_defaults() {
        let raw = json!({
            "version": 1,
            "program": {
                "variables": [],
                "rungs": [{ "id": 1, "elements": [{ "id": 1, "type": "NormallyOpen" }] }]
            }
        });

        let migrated = migrate(raw).expect("Migration");

        assert_eq!(migrated["version"], json!(CURRENT_VERSION));
        let rung = &migrated["program"]["rungs"][0];
        assert_eq!(rung["elements"][0]["kind"], json!("NormallyOpen"));
        assert!(rung["elements"][0].get("type").is_none());
        assert_eq!(rung["width"], json!(DEFAULT_RUNG_WIDTH));
        assert_eq!(rung["branches"], json!([]));
        assert_eq!(migrated["symbol_entry"]["instruction"], json!("contact"));
    }

    #[test]
    fn test_current_version_is_untouched() {
        let raw = json!({ "version": CURRENT_VERSION, "program": { "rungs": [] } });
        assert_eq!(migrate(raw.clone()).expect("Migration"), raw);
    }

    #[test]
    fn test_missing_and_future_versions_fail() {
        assert!(matches!(
            migrate(json!({ "program": {} })),
            Err(PersistError::MissingVersion)
        ));
        assert!(matches!(
            migrate(json!([1, 2, 3])),
            Err(PersistError::MissingVersion)
        ));
        assert!(matches!(
            migrate(json!({ "version": 99 })),
            Err(PersistError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_missing_rungs_reports_migration_error() {
        assert!(matches!(
            migrate(json!({ "version": 2, "program": {} })),
            Err(PersistError::Migration { from: 2, .. })
        ));
    }
}
