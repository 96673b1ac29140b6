//! Fuzz target for YAML dataset documents.
//!
//! Accepted documents must describe a consistent dataset.

#![no_main]

use libfuzzer_sys::fuzz_target;
use motfix::model::io_yaml::from_yaml_str;
use motfix::validation::validate_document;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(value) = from_yaml_str(text) {
        if let Ok(dataset) = validate_document(&value) {
            assert!(dataset.is_consistent());
        }
    }
});
