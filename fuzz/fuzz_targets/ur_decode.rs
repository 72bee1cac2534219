//! UR string fuzz target.
//!
//! Fuzzes the text layer: scheme and path parsing, bytewords in every style,
//! and the stateful multipart decoder fed line by line.
//!
//! Goal: no panics on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ur_envelope::{Style, UrDecoder, UrFrame, bytewords};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = UrFrame::parse(text);
    let _ = UrDecoder::decode(text);
    for style in [Style::Standard, Style::Uri, Style::Minimal] {
        let _ = bytewords::decode(text, style);
    }

    let mut decoder = UrDecoder::new();
    for line in text.lines() {
        let _ = decoder.receive_part(line);
        if decoder.is_complete() {
            break;
        }
    }
});
