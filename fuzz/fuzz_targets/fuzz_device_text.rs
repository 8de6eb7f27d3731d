#![no_main]

use libfuzzer_sys::fuzz_target;
use plc_ladder_sim::validate_device_text;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(Some(device)) = validate_device_text(text) {
            // Normalisierte Form muss sich selbst wieder validieren
            let again = validate_device_text(&device.to_string());
            assert_eq!(again, Ok(Some(device)));
        }
    }
});
