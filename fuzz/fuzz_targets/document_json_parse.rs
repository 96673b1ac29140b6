//! Fuzz target for dataset document parsing and the import gate.
//!
//! Arbitrary bytes are parsed as JSON and, when that succeeds, run through
//! `validate_document`. Accepted documents must describe a consistent
//! dataset.

#![no_main]

use libfuzzer_sys::fuzz_target;
use motfix::model::io_json::from_json_slice;
use motfix::validation::validate_document;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(value) = from_json_slice(data) {
        if let Ok(dataset) = validate_document(&value) {
            assert!(dataset.is_consistent());
        }
    }
});
