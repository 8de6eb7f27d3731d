#![no_main]

use libfuzzer_sys::fuzz_target;
use plc_ladder_sim::{persist, run_cycle};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Geladene Projekte müssen einen Scan-Zyklus ohne Panic überstehen
        if let Ok(mut project) = persist::from_json_str(text) {
            let _ = run_cycle(&mut project.program, 1);
        }
    }
});
