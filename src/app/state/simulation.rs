//! Zustand der Simulation (Einzelschritt / Free-Run).

use crate::core::EditCommand;
use crate::scan::CycleReport;
use std::collections::VecDeque;

/// Betriebsart der Simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimulationMode {
    /// Zyklen nur auf Anforderung
    #[default]
    Stopped,
    /// Zyklen im Takt der Host-Ticks
    FreeRun,
}

/// Bearbeitung, die während des Free-Runs bis zum nächsten Zyklusende wartet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingEdit {
    /// Bearbeitungsbefehl
    Edit(EditCommand),
    /// Undo-Schritt
    Undo,
    /// Redo-Schritt
    Redo,
}

/// Laufzeitzustand der Simulation.
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    /// Betriebsart
    pub mode: SimulationMode,
    /// Anzahl ausgeführter Zyklen seit dem Laden
    pub cycle_count: u64,
    /// Bericht des letzten Zyklus
    pub last_report: Option<CycleReport>,
    pending: VecDeque<PendingEdit>,
    accumulated_ms: u64,
}

impl SimulationState {
    /// Erstellt einen gestoppten Zustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gibt zurück, ob der Free-Run aktiv ist.
    pub fn is_running(&self) -> bool {
        self.mode == SimulationMode::FreeRun
    }

    /// Startet den Free-Run. Liefert `false`, wenn er schon lief.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.mode = SimulationMode::FreeRun;
        self.accumulated_ms = 0;
        true
    }

    /// Stoppt den Free-Run. Der letzte Zustand bleibt erhalten.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.mode = SimulationMode::Stopped;
        self.accumulated_ms = 0;
        true
    }

    /// Reiht eine Bearbeitung für das nächste Zyklusende ein.
    pub fn queue(&mut self, edit: PendingEdit) {
        self.pending.push_back(edit);
    }

    /// Entnimmt alle wartenden Bearbeitungen in Eingangsreihenfolge.
    pub fn take_pending(&mut self) -> Vec<PendingEdit> {
        self.pending.drain(..).collect()
    }

    /// Anzahl wartender Bearbeitungen.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Addiert Host-Zeit und liefert die Anzahl fälliger Zyklen.
    ///
    /// Mehr als `max_cycles` werden nicht nachgeholt, der Rest verfällt.
    pub fn advance(&mut self, elapsed_ms: u64, period_ms: u64, max_cycles: u32) -> u32 {
        let period = period_ms.max(1);
        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        let due = self.accumulated_ms / period;
        self.accumulated_ms %= period;
        if due > u64::from(max_cycles) {
            log::debug!("Free-Run: {} Zyklen verworfen", due - u64::from(max_cycles));
            return max_cycles;
        }
        due as u32
    }

    /// Setzt Zähler und Bericht zurück (neues Programm geladen).
    pub fn reset(&mut self) {
        self.mode = SimulationMode::Stopped;
        self.cycle_count = 0;
        self.last_report = None;
        self.pending.clear();
        self.accumulated_ms = 0;
    }

    /// Kurzfassung der Fehler des letzten Zyklus.
    pub fn fault_summary(&self) -> Vec<String> {
        self.last_report
            .as_ref()
            .map(|r| r.faults.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }
}
