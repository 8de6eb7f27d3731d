//! PLC Ladder Simulator.
//!
//! Kommandozeilen-Host: lädt ein Kontaktplan-Programm, forct Variablen und
//! führt Scan-Zyklen im Einzelschritt oder im Free-Run aus.

use anyhow::Context;
use clap::Parser;
use plc_ladder_sim::{
    validate_device_text, AppController, AppIntent, AppState, SimulatorOptions, VarValue,
};
use std::path::PathBuf;
use std::time::Duration;

/// Scan-Zyklus-Simulator für Kontaktplan-Programme
#[derive(Parser)]
#[command(name = "PLC-Ladder-Sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Projektdatei (JSON); ohne Angabe wird das Beispielprogramm geladen
    #[arg(short, long, env = "PLC_LADDER_PROGRAM")]
    program: Option<PathBuf>,

    /// Optionen-Datei (TOML); Standard: neben der Binary
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Anzahl auszuführender Scan-Zyklen
    #[arg(short = 'n', long, default_value_t = 1)]
    cycles: u64,

    /// Variable vor dem ersten Zyklus forcen, z.B. `X0=1` oder `D0=42`
    #[arg(short, long = "force", value_name = "DEV=VAL")]
    forces: Vec<String>,

    /// Zyklen im Takt von `scan_period_ms` ausführen statt im Einzelschritt
    #[arg(long)]
    free_run: bool,

    /// Projekt nach dem Lauf hier speichern
    #[arg(short, long)]
    save: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("PLC Ladder Simulator v{} startet...", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(SimulatorOptions::config_path);
    let options = SimulatorOptions::load_from_file(&config_path);

    let mut state = AppState::with_options(options);
    let mut controller = AppController::new();

    let load = match cli.program.clone() {
        Some(path) => AppIntent::OpenProjectRequested { path },
        None => AppIntent::SampleProgramRequested,
    };
    controller.handle_intent(&mut state, load)?;

    for force in &cli.forces {
        let (device, value) = parse_force(force)?;
        controller.handle_intent(
            &mut state,
            AppIntent::SetVariableValueRequested { device, value },
        )?;
    }

    if cli.free_run {
        run_free(&mut controller, &mut state, cli.cycles)?;
    } else {
        for _ in 0..cli.cycles {
            controller.handle_intent(&mut state, AppIntent::CycleScanRequested)?;
        }
    }

    print_summary(&state);

    if let Some(path) = cli.save {
        controller.handle_intent(&mut state, AppIntent::SaveAsRequested { path })?;
    }
    Ok(())
}

/// Free-Run: Host-Ticks im Takt der Scan-Periode, bis `cycles` Zyklen gelaufen
/// sind oder der Free-Run wegen eines Fehlers anhält.
fn run_free(
    controller: &mut AppController,
    state: &mut AppState,
    cycles: u64,
) -> anyhow::Result<()> {
    let period = state.options.effective_scan_period_ms();
    let target = state.simulation.cycle_count + cycles;

    controller.handle_intent(state, AppIntent::StartSimulationRequested)?;
    while state.simulation.is_running() && state.simulation.cycle_count < target {
        std::thread::sleep(Duration::from_millis(period));
        controller.handle_intent(state, AppIntent::HostTick { elapsed_ms: period })?;
    }
    controller.handle_intent(state, AppIntent::StopSimulationRequested)
}

/// Zerlegt `DEV=VAL`. Bits akzeptieren `0/1/on/off/true/false`, Register Ganzzahlen.
fn parse_force(text: &str) -> anyhow::Result<(String, VarValue)> {
    let (device_text, value_text) = text
        .split_once('=')
        .with_context(|| format!("--force erwartet DEV=VAL, erhalten: {text}"))?;
    let device = validate_device_text(device_text)?
        .with_context(|| format!("--force ohne Gerät: {text}"))?;

    let value_text = value_text.trim();
    let value = if device.kind.is_discrete() {
        match value_text.to_ascii_lowercase().as_str() {
            "1" | "on" | "true" => VarValue::Bool(true),
            "0" | "off" | "false" => VarValue::Bool(false),
            other => anyhow::bail!("Bitwert für {device} erwartet, erhalten: {other}"),
        }
    } else {
        VarValue::Int(
            value_text
                .parse()
                .with_context(|| format!("Ganzzahl für {device} erwartet: {value_text}"))?,
        )
    };
    Ok((device.to_string(), value))
}

fn print_summary(state: &AppState) {
    println!(
        "Zyklen: {}  Strompfade: {}  Elemente: {}",
        state.simulation.cycle_count,
        state.rung_count(),
        state.element_count()
    );
    for variable in state.program.variables.values() {
        println!("  {:<8} {}", variable.name.to_string(), variable.value);
    }
    for fault in state.simulation.fault_summary() {
        println!("  Fehler: {fault}");
    }
}
