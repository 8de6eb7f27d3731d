//! Zentrale Konfiguration des Ladder-Simulators.
//!
//! `SimulatorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::DEFAULT_RUNG_WIDTH;
use serde::{Deserialize, Serialize};

// ── Scan ────────────────────────────────────────────────────────────

/// Free-Run-Periode in Millisekunden.
pub const SCAN_PERIOD_MS: u64 = 100;
/// Timer-Zeitbasis: Ticks pro Scan-Zyklus.
pub const TICKS_PER_CYCLE: i32 = 1;
/// Obergrenze an Zyklen, die ein einzelner Host-Tick nachholen darf.
pub const MAX_CYCLES_PER_TICK: u32 = 100;

// ── Bearbeitung ─────────────────────────────────────────────────────

/// Standard-Tiefe der Undo-History.
pub const HISTORY_DEPTH: usize = 200;

/// Name der Optionen-Datei neben der Binary.
pub const OPTIONS_FILE_NAME: &str = "plc_ladder_sim.toml";

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Simulator-Optionen.
/// Wird als `plc_ladder_sim.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorOptions {
    /// Spaltenanzahl neuer Strompfade
    #[serde(default = "default_rung_width")]
    pub rung_width: u16,
    /// Maximale Undo-Tiefe
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    /// Free-Run-Periode in Millisekunden
    #[serde(default = "default_scan_period_ms")]
    pub scan_period_ms: u64,
    /// Timer-Fortschritt pro Zyklus
    #[serde(default = "default_ticks_per_cycle")]
    pub ticks_per_cycle: i32,
    /// Free-Run beim ersten fehlerbehafteten Zyklus anhalten
    #[serde(default)]
    pub stop_on_fault: bool,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            rung_width: DEFAULT_RUNG_WIDTH,
            history_depth: HISTORY_DEPTH,
            scan_period_ms: SCAN_PERIOD_MS,
            ticks_per_cycle: TICKS_PER_CYCLE,
            stop_on_fault: false,
        }
    }
}

/// Serde-Default für `rung_width` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_rung_width() -> u16 {
    DEFAULT_RUNG_WIDTH
}

fn default_history_depth() -> usize {
    HISTORY_DEPTH
}

fn default_scan_period_ms() -> u64 {
    SCAN_PERIOD_MS
}

fn default_ticks_per_cycle() -> i32 {
    TICKS_PER_CYCLE
}

impl SimulatorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("plc_ladder_sim"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join(OPTIONS_FILE_NAME)
    }

    /// Free-Run-Periode, mindestens 1 ms.
    pub fn effective_scan_period_ms(&self) -> u64 {
        self.scan_period_ms.max(1)
    }
}
