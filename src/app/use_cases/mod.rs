//! Use-Cases der Application-Layer-Orchestrierung.

pub mod editing;
pub mod file_io;
pub mod program;
pub mod simulation;
pub mod symbol_entry;
