//! PLC Ladder Simulator Library.
//! Schaltungsmodell, Scan-Zyklus und Undo/Redo-Editing als Library exportiert
//! für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod persist;
pub mod scan;
pub mod shared;

pub use app::{AppCommand, AppController, AppIntent, AppState, EditHistory, SymbolCommit};
pub use core::{
    check_program, plan, validate_device_text, DeviceError, DeviceRef, EditCommand, EditError,
    Element, ElementKind, LadderProgram, Patch, Rung, VarValue, Variable,
};
pub use persist::{PersistError, PersistedProject};
pub use scan::{evaluate_cycle, run_cycle, CycleReport, FaultKind, ScanFault};
pub use shared::SimulatorOptions;
