//! Binary encoding.
//!
//! Integers and lengths always use the shortest head. `Map` entries are written
//! in canonical key order; `OrderedMap` entries in insertion order.

use crate::date::Date;
use crate::error::EncodeError;
use crate::value::Value;

pub(crate) const MAJOR_UNSIGNED: u8 = 0;
pub(crate) const MAJOR_NEGATIVE: u8 = 1;
pub(crate) const MAJOR_BYTES: u8 = 2;
pub(crate) const MAJOR_TEXT: u8 = 3;
pub(crate) const MAJOR_ARRAY: u8 = 4;
pub(crate) const MAJOR_MAP: u8 = 5;
pub(crate) const MAJOR_TAG: u8 = 6;

pub(crate) const TAG_EPOCH_DATE: u64 = 1;
pub(crate) const TAG_DAYS_DATE: u64 = 100;

/// Append the head for `major` carrying argument `n`, in its shortest form.
#[allow(clippy::cast_possible_truncation)] // each arm is bounded by its range
pub(crate) fn write_head(major: u8, n: u64, out: &mut Vec<u8>) {
    let mt = major << 5;
    match n {
        0..=23 => out.push(mt | n as u8),
        24..=0xff => {
            out.push(mt | 24);
            out.push(n as u8);
        }
        0x100..=0xffff => {
            out.push(mt | 25);
            out.extend_from_slice(&(n as u16).to_be_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(mt | 26);
            out.extend_from_slice(&(n as u32).to_be_bytes());
        }
        _ => {
            out.push(mt | 27);
            out.extend_from_slice(&n.to_be_bytes());
        }
    }
}

/// Head bytes for `major` / `n` as a fresh buffer.
pub(crate) fn head(major: u8, n: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    write_head(major, n, &mut out);
    out
}

pub(crate) fn write_simple(n: u8, out: &mut Vec<u8>) {
    if n < 24 {
        out.push(0xe0 | n);
    } else {
        out.push(0xf8);
        out.push(n);
    }
}

/// Encoded form of a date's timestamp, without the tag head.
#[allow(clippy::cast_sign_loss)] // guarded by the sign checks
pub(crate) fn write_date_body(date: &Date, out: &mut Vec<u8>) {
    match date.whole_seconds() {
        Some(s) if s >= 0 && s <= i64::from(u32::MAX) => write_head(MAJOR_UNSIGNED, s as u64, out),
        Some(s) if s < 0 => write_head(MAJOR_NEGATIVE, !s as u64, out),
        _ => {
            out.push(0xfb);
            out.extend_from_slice(&date.timestamp().to_be_bytes());
        }
    }
}

/// Encode with half floats written as raw `0xf9` items.
///
/// Used for map sort keys and dumps, where every value needs a byte form.
pub(crate) fn encode_infallible(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Unsigned(n) => write_head(MAJOR_UNSIGNED, *n, out),
        Value::Negative(n) => write_head(MAJOR_NEGATIVE, *n, out),
        Value::Bytes(b) => {
            write_head(MAJOR_BYTES, b.len() as u64, out);
            out.extend_from_slice(b);
        }
        Value::Text(s) => {
            write_head(MAJOR_TEXT, s.len() as u64, out);
            out.extend_from_slice(s.as_bytes());
        }
        Value::Array(items) => {
            write_head(MAJOR_ARRAY, items.len() as u64, out);
            for item in items {
                write_value(item, out);
            }
        }
        Value::Map(m) => {
            write_head(MAJOR_MAP, m.len() as u64, out);
            for (key_bytes, _, v) in m.iter_encoded() {
                out.extend_from_slice(key_bytes);
                write_value(v, out);
            }
        }
        Value::OrderedMap(m) => {
            write_head(MAJOR_MAP, m.len() as u64, out);
            for (k, v) in m.iter() {
                write_value(k, out);
                write_value(v, out);
            }
        }
        Value::Tagged(tag, inner) => {
            write_head(MAJOR_TAG, tag.value(), out);
            write_value(inner, out);
        }
        Value::Simple(n) => write_simple(*n, out),
        Value::Bool(b) => out.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => out.push(0xf6),
        Value::Undefined => out.push(0xf7),
        Value::Half(h) => {
            out.push(0xf9);
            out.extend_from_slice(&h.to_bits().to_be_bytes());
        }
        Value::Float(f) => {
            out.push(0xfa);
            out.extend_from_slice(&f.to_be_bytes());
        }
        Value::Double(d) => {
            out.push(0xfb);
            out.extend_from_slice(&d.to_be_bytes());
        }
        Value::Break => out.push(0xff),
        Value::Date(d) => {
            write_head(MAJOR_TAG, TAG_EPOCH_DATE, out);
            write_date_body(d, out);
        }
    }
}

impl Value {
    /// Encode to CBOR bytes.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::UnsupportedHalfFloat` if the value contains a
    /// half-precision float anywhere, `EncodeError::ReservedSimpleValue` for
    /// simple values 20..=31 and `EncodeError::StrayBreak` for a break.
    pub fn to_cbor(&self) -> Result<Vec<u8>, EncodeError> {
        let unencodable =
            self.find(&|v| matches!(v, Self::Half(_) | Self::Simple(20..=31) | Self::Break));
        match unencodable {
            None => Ok(encode_infallible(self)),
            Some(Self::Half(_)) => Err(EncodeError::UnsupportedHalfFloat),
            Some(Self::Simple(n)) => Err(EncodeError::ReservedSimpleValue(*n)),
            Some(_) => Err(EncodeError::StrayBreak),
        }
    }
}
