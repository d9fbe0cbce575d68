#![no_main]

use libfuzzer_sys::fuzz_target;
use stl2scad::{convert, ConvertOptions};

fuzz_target!(|data: &[u8]| {
    let options = ConvertOptions {
        include_bounding_box: true,
        ..ConvertOptions::default()
    };

    if let Ok(scad) = convert(data, &options) {
        assert!(scad.is_empty() || scad.starts_with("module "));
    }
});
