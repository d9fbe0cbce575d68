#![no_main]

use libfuzzer_sys::fuzz_target;
use stl2scad::io::stl::{CounterSink, Encoding, Reader};

fuzz_target!(|data: &[u8]| {
    // Only panics are interesting, so all parsed data and every `Result` is
    // ignored. Both decoders get the data, regardless of what `sniff` says.
    let _ = Reader::with_encoding(data, Encoding::Ascii).read_raw_into(&mut CounterSink::new());
    let _ = Reader::with_encoding(data, Encoding::Binary).read_raw_into(&mut CounterSink::new());
});
