//! Fountain part fuzz target.
//!
//! Fuzzes part parsing and the decoder's validation of hostile headers:
//! oversized lengths, inconsistent fragment sizes and mixed sessions.
//!
//! Goal: no panics and no unbounded allocation on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ur_fountain::{FountainConfig, FountainDecoder, Part};

fuzz_target!(|data: &[u8]| {
    let config = FountainConfig::default().with_max_seq_len(1024);
    let mut decoder = FountainDecoder::with_config(&config);

    // Treat the input as a run of length-prefixed parts.
    let mut rest = data;
    while let Some((&len, tail)) = rest.split_first() {
        let len = usize::from(len).min(tail.len());
        let (chunk, next) = tail.split_at(len);
        rest = next;

        if let Ok(part) = Part::from_cbor(chunk) {
            let _ = part.to_string();
            let _ = decoder.try_receive_part(&part);
        }
        if decoder.is_complete() {
            break;
        }
    }
    let _ = decoder.estimated_percent_complete();
});
