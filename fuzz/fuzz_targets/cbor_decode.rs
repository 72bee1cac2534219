//! CBOR decode fuzz target.
//!
//! Fuzzes value decoding including:
//! - Strict and ordered-key map handling
//! - Nesting depth limits
//! - Diagnostic and dump rendering of whatever decodes
//!
//! Goal: no panics on arbitrary input; anything that decodes without half
//! floats re-encodes and decodes again.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ur_cbor::{DecodeOptions, Value};

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = Value::from_cbor(data) {
        let _ = value.diagnostic();
        let _ = value.dump();
        if !value.contains_half() {
            if let Ok(bytes) = value.to_cbor() {
                assert!(Value::from_cbor(&bytes).is_ok());
            }
        }
    }

    let ordered = DecodeOptions::default().with_ordered_keys(true);
    if let Ok(value) = Value::from_cbor_with(data, ordered) {
        let _ = value.diagnostic();
    }

    // Shallow limit exercises the depth guard on every nested input.
    let shallow = DecodeOptions::default().with_max_depth(2);
    let _ = Value::from_cbor_with(data, shallow);
});
