//! Fuzz target for edit scripts applied to the demo dataset.
//!
//! Every script that parses is applied step by step; the store must stay
//! consistent throughout.

#![no_main]

use libfuzzer_sys::fuzz_target;
use motfix::edit::fuzz_apply_script;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    let _ = fuzz_apply_script(data);
});
