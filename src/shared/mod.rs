//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die `app`, `persist` und die Binary
//! gemeinsam nutzen.

pub mod options;

pub use options::SimulatorOptions;
pub use options::{MAX_CYCLES_PER_TICK, OPTIONS_FILE_NAME};
