//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};

/// Orchestriert UI-/Host-Events und Use-Cases auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    ///
    /// Validierungsfehler (z.B. [`crate::core::EditError`]) werden unverändert
    /// geliefert und lassen den State unverändert.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Datei-I/O & Programm ===
            AppCommand::LoadTemplate { template } => {
                handlers::editing::load_template(state, template)
            }
            AppCommand::LoadProject { path } => handlers::file_io::load(state, path)?,
            AppCommand::SaveProject { path } => handlers::file_io::save(state, path)?,
            AppCommand::ApplyOptions { options } => handlers::editing::apply_options(state, options),
            AppCommand::CheckProgram => handlers::editing::check(state),

            // === Bearbeitung & History ===
            AppCommand::ApplyEdit { command } => handlers::editing::apply(state, command)?,
            AppCommand::Undo => handlers::history::undo(state)?,
            AppCommand::Redo => handlers::history::redo(state)?,

            // === Simulation ===
            AppCommand::RunScanCycle => handlers::simulation::step(state),
            AppCommand::StartFreeRun => handlers::simulation::start(state),
            AppCommand::StopFreeRun => handlers::simulation::stop(state),
            AppCommand::AdvanceFreeRun { elapsed_ms } => {
                handlers::simulation::advance(state, elapsed_ms)
            }

            // === Symbol-Eingabe ===
            AppCommand::OpenSymbolEntry { instruction } => {
                handlers::symbol_entry::open(state, instruction)
            }
            AppCommand::SetSymbolDeviceText { text } => {
                handlers::symbol_entry::set_device_text(state, &text)
            }
            AppCommand::SetSymbolInstruction { instruction } => {
                handlers::symbol_entry::set_instruction(state, instruction)
            }
            AppCommand::SetSymbolContinuous { enabled } => {
                handlers::symbol_entry::set_continuous(state, enabled)
            }
            AppCommand::SetDeviceCommentContinuous { enabled } => {
                handlers::symbol_entry::set_device_comment_continuous(state, enabled)
            }
            AppCommand::CloseSymbolEntry => handlers::symbol_entry::close(state),
            AppCommand::CommitSymbolEntry { rung } => handlers::symbol_entry::confirm(state, rung)?,
            AppCommand::PlaceSymbol { rung, commit } => {
                handlers::symbol_entry::place(state, rung, &commit)?
            }
        }

        Ok(())
    }
}
