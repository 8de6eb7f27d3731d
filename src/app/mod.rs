//! Application-Layer: Controller, State, Events und Use-Cases.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod history;
mod intent_mapping;
/// Application State
///
/// Dieses Modul verwaltet den Zustand der Anwendung (Programm, History, Simulation).
pub mod state;
pub mod use_cases;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, AppIntent, ProgramTemplate};
pub use history::{EditHistory, HistoryEntry, Patchable};
pub use state::{
    AppState, PendingEdit, SimulationMode, SimulationState, SymbolCommit, SymbolEntryPrefs,
    SymbolEntryState, SymbolInstruction,
};
