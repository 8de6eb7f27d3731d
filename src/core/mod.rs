//! Core-Domänentypen: Devices, Elementkatalog, Programm-Modell und Patches.

pub mod catalog;
pub mod check;
pub mod device;
pub mod edit;
pub mod element;
pub mod patch;
/// Das Programm-Modell
///
/// - LadderProgram: Strompfade in Scan-Reihenfolge plus Variablentabelle
/// - Rung/Branch: Hauptpfad und parallele Verzweigungen
/// - Element: Kontakt, Spule oder Funktionsbaustein mit Operanden
pub mod program;
pub mod rung;
pub mod variable;

pub use catalog::{CompareOp, ElementClass, ElementKind, ElementSpec, MathOp, PinRole, PinSpec};
pub use check::{check_program, Diagnostic, DiagnosticKind};
pub use device::{validate_device_text, DeviceError, DeviceKind, DeviceRef};
pub use edit::{plan, EditCommand, EditError};
pub use element::{BranchId, Element, ElementId, ElementState, Operand, Position, RungId};
pub use patch::{Patch, PatchError, PatchOp};
pub use program::LadderProgram;
pub use rung::{Branch, Rung, DEFAULT_RUNG_WIDTH};
pub use variable::{VarValue, Variable};
