//! Application State: Programm, History, Simulation und Symbol-Eingabe.

mod app_state;
mod simulation;
mod symbol_entry;

pub use app_state::AppState;
pub use simulation::{PendingEdit, SimulationMode, SimulationState};
pub use symbol_entry::{SymbolCommit, SymbolEntryPrefs, SymbolEntryState, SymbolInstruction};
