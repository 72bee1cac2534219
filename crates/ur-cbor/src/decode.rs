//! Binary decoding.
//!
//! The decoder walks a byte cursor and never trusts a declared length for
//! preallocation. Map keys must appear in strictly ascending order of their
//! wire bytes.

use std::cmp::Ordering;
use std::sync::Arc;

use half::f16;

use crate::date::Date;
use crate::encode::{
    MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGATIVE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UNSIGNED,
    TAG_DAYS_DATE, TAG_EPOCH_DATE,
};
use crate::error::DecodeError;
use crate::map::{Map, OrderedMap};
use crate::tag::{Tag, TagRegistry};
use crate::value::Value;

const BREAK: u8 = 0xff;

/// Decoder settings.
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Decode maps as [`OrderedMap`] instead of [`Map`].
    ///
    /// Default: `false`
    pub ordered_keys: bool,

    /// Maximum nesting depth of arrays, maps and tags.
    ///
    /// Default: 256
    pub max_depth: usize,

    /// Registry used to attach names to decoded tags.
    ///
    /// Default: `None` (tags carry no name)
    pub registry: Option<Arc<TagRegistry>>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            ordered_keys: false,
            max_depth: 256,
            registry: None,
        }
    }
}

impl DecodeOptions {
    /// Set whether maps decode as [`OrderedMap`].
    #[must_use]
    pub const fn with_ordered_keys(mut self, ordered_keys: bool) -> Self {
        self.ordered_keys = ordered_keys;
        self
    }

    /// Set the nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve tag names through `registry`.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<TagRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }
}

/// Cursor-based decoder over a byte buffer.
#[derive(Debug)]
pub struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
    options: DecodeOptions,
}

impl<'a> Decoder<'a> {
    /// Decoder with default options.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, DecodeOptions::default())
    }

    /// Decoder with explicit options.
    #[must_use]
    pub const fn with_options(input: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            input,
            pos: 0,
            options,
        }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// True once every input byte has been consumed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Read one complete data item.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] describing the first malformation found.
    pub fn decode_item(&mut self) -> Result<Value, DecodeError> {
        self.read_item(0)
    }

    const fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::UnfinishedSequence);
        }
        let input = self.input;
        let slice = &input[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0_u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn peek(&self) -> Result<u8, DecodeError> {
        self.input
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnfinishedSequence)
    }

    /// Read the argument selected by the low five bits of `initial`.
    fn read_argument(&mut self, initial: u8) -> Result<u64, DecodeError> {
        match initial & 0x1f {
            info @ 0..=23 => Ok(u64::from(info)),
            24 => Ok(u64::from(self.take_byte()?)),
            25 => Ok(u64::from(u16::from_be_bytes(self.take_array()?))),
            26 => Ok(u64::from(u32::from_be_bytes(self.take_array()?))),
            27 => Ok(u64::from_be_bytes(self.take_array()?)),
            _ => Err(DecodeError::InvalidHeader(initial)),
        }
    }

    /// Convert a declared length, rejecting anything past the addressable range.
    fn length(len: u64) -> Result<usize, DecodeError> {
        usize::try_from(len)
            .ok()
            .filter(|&n| isize::try_from(n).is_ok())
            .ok_or(DecodeError::TooLongSequence { len })
    }

    fn read_item(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > self.options.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        let initial = self.take_byte()?;
        let major = initial >> 5;
        if major == 7 {
            return self.read_simple_or_float(initial);
        }
        if initial & 0x1f == 31 {
            return match major {
                MAJOR_BYTES | MAJOR_TEXT => self.read_indefinite_string(major, depth),
                MAJOR_ARRAY => self.read_indefinite_array(depth),
                MAJOR_MAP => self.read_map(None, depth),
                _ => Err(DecodeError::InvalidHeader(initial)),
            };
        }
        let arg = self.read_argument(initial)?;
        match major {
            MAJOR_UNSIGNED => Ok(Value::Unsigned(arg)),
            MAJOR_NEGATIVE => Ok(Value::Negative(arg)),
            MAJOR_BYTES => {
                let len = Self::length(arg)?;
                Ok(Value::Bytes(self.take(len)?.to_vec()))
            }
            MAJOR_TEXT => {
                let len = Self::length(arg)?;
                let bytes = self.take(len)?;
                std::str::from_utf8(bytes)
                    .map(|s| Value::Text(s.to_owned()))
                    .map_err(|_| DecodeError::IncorrectUtf8String)
            }
            MAJOR_ARRAY => {
                let count = Self::length(arg)?;
                // every item needs at least one byte
                if count > self.remaining() {
                    return Err(DecodeError::UnfinishedSequence);
                }
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.read_item(depth + 1)?);
                }
                Ok(Value::Array(items))
            }
            MAJOR_MAP => {
                let count = Self::length(arg)?;
                if count.saturating_mul(2) > self.remaining() {
                    return Err(DecodeError::UnfinishedSequence);
                }
                self.read_map(Some(count), depth)
            }
            MAJOR_TAG => self.read_tagged(arg, depth),
            _ => Err(DecodeError::InvalidHeader(initial)),
        }
    }

    fn read_simple_or_float(&mut self, initial: u8) -> Result<Value, DecodeError> {
        match initial & 0x1f {
            n @ 0..=19 => Ok(Value::Simple(n)),
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            22 => Ok(Value::Null),
            23 => Ok(Value::Undefined),
            24 => match self.take_byte()? {
                // values below 32 have a one-byte form or are reserved
                n if n < 32 => Err(DecodeError::InvalidHeader(initial)),
                n => Ok(Value::Simple(n)),
            },
            25 => Ok(Value::Half(f16::from_bits(u16::from_be_bytes(
                self.take_array()?,
            )))),
            26 => Ok(Value::Float(f32::from_be_bytes(self.take_array()?))),
            27 => Ok(Value::Double(f64::from_be_bytes(self.take_array()?))),
            31 => Err(DecodeError::WrongTypeInsideSequence),
            _ => Err(DecodeError::InvalidHeader(initial)),
        }
    }

    fn read_indefinite_string(&mut self, major: u8, depth: usize) -> Result<Value, DecodeError> {
        let mut bytes = Vec::new();
        let mut text = String::new();
        while !self.take_break()? {
            match (major, self.read_item(depth + 1)?) {
                (MAJOR_BYTES, Value::Bytes(chunk)) => bytes.extend_from_slice(&chunk),
                (MAJOR_TEXT, Value::Text(chunk)) => text.push_str(&chunk),
                _ => return Err(DecodeError::WrongTypeInsideSequence),
            }
        }
        Ok(if major == MAJOR_BYTES {
            Value::Bytes(bytes)
        } else {
            Value::Text(text)
        })
    }

    fn read_indefinite_array(&mut self, depth: usize) -> Result<Value, DecodeError> {
        let mut items = Vec::new();
        while !self.take_break()? {
            items.push(self.read_item(depth + 1)?);
        }
        Ok(Value::Array(items))
    }

    /// Consume a break byte if one is next.
    fn take_break(&mut self) -> Result<bool, DecodeError> {
        if self.peek()? == BREAK {
            self.pos += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Read map entries; `count` is `None` for an indefinite map.
    fn read_map(&mut self, count: Option<usize>, depth: usize) -> Result<Value, DecodeError> {
        let mut map = Map::new();
        let mut ordered = OrderedMap::new();
        let mut previous_key: Option<&'a [u8]> = None;
        let mut read = 0_usize;
        loop {
            if count.is_some_and(|c| read == c) {
                break;
            }
            if count.is_none() && self.take_break()? {
                break;
            }
            let start = self.pos;
            let key = self.read_item(depth + 1)?;
            let input = self.input;
            let key_bytes = &input[start..self.pos];
            if let Some(prev) = previous_key {
                match prev.cmp(key_bytes) {
                    Ordering::Less => {}
                    Ordering::Equal => return Err(DecodeError::DuplicateKey),
                    Ordering::Greater => return Err(DecodeError::KeysOutOfOrder),
                }
            }
            previous_key = Some(key_bytes);

            let value = self.read_item(depth + 1)?;
            if self.options.ordered_keys {
                ordered.push(key, value);
            } else if map.insert(key, value).is_some() {
                // distinct wire forms of one key
                return Err(DecodeError::DuplicateKey);
            }
            read += 1;
        }
        Ok(if self.options.ordered_keys {
            Value::OrderedMap(ordered)
        } else {
            Value::Map(map)
        })
    }

    #[allow(clippy::cast_precision_loss)] // timestamps beyond 2^53 lose sub-second precision
    fn read_tagged(&mut self, tag: u64, depth: usize) -> Result<Value, DecodeError> {
        let inner = self.read_item(depth + 1)?;
        match tag {
            TAG_EPOCH_DATE => {
                let seconds = match inner {
                    Value::Unsigned(n) => n as f64,
                    Value::Negative(n) => -1.0 - n as f64,
                    Value::Float(f) => f64::from(f),
                    Value::Double(d) => d,
                    _ => return Err(DecodeError::WrongTypeInsideSequence),
                };
                Ok(Value::Date(Date::from_timestamp(seconds)))
            }
            TAG_DAYS_DATE => {
                let days = match inner {
                    Value::Unsigned(n) => {
                        i64::try_from(n).map_err(|_| DecodeError::ValueOutOfRange)?
                    }
                    Value::Negative(n) => {
                        -1 - i64::try_from(n).map_err(|_| DecodeError::ValueOutOfRange)?
                    }
                    _ => return Err(DecodeError::WrongTypeInsideSequence),
                };
                Ok(Value::Date(Date::from_days(days)))
            }
            _ => {
                let tag = self
                    .options
                    .registry
                    .as_ref()
                    .and_then(|r| r.lookup_by_id(tag))
                    .unwrap_or_else(|| Tag::new(tag));
                Ok(Value::Tagged(tag, Box::new(inner)))
            }
        }
    }
}

impl Value {
    /// Decode a complete buffer with default options.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] for malformed input, including
    /// [`DecodeError::TrailingBytes`] when bytes follow the item.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_cbor_with(bytes, DecodeOptions::default())
    }

    /// Decode a complete buffer with explicit options.
    ///
    /// # Errors
    ///
    /// As [`Value::from_cbor`].
    pub fn from_cbor_with(bytes: &[u8], options: DecodeOptions) -> Result<Self, DecodeError> {
        let mut decoder = Decoder::with_options(bytes, options);
        let result = decoder.decode_item().and_then(|value| {
            if decoder.is_empty() {
                Ok(value)
            } else {
                Err(DecodeError::TrailingBytes)
            }
        });
        if let Err(err) = &result {
            tracing::trace!(
                error = %err,
                position = decoder.position(),
                len = bytes.len(),
                "CBOR decode failed"
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_hex(s: &str) -> Result<Value, DecodeError> {
        Value::from_cbor(&hex::decode(s).unwrap())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scalars
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn decodes_integers() {
        assert_eq!(decode_hex("00"), Ok(Value::Unsigned(0)));
        assert_eq!(decode_hex("1903e8"), Ok(Value::Unsigned(1000)));
        assert_eq!(decode_hex("1bffffffffffffffff"), Ok(Value::Unsigned(u64::MAX)));
        assert_eq!(decode_hex("3863"), Ok(Value::from(-100)));
        // non-minimal forms are accepted
        assert_eq!(decode_hex("1800"), Ok(Value::Unsigned(0)));
    }

    #[test]
    fn decodes_simple_and_floats() {
        assert_eq!(decode_hex("f4"), Ok(Value::Bool(false)));
        assert_eq!(decode_hex("f5"), Ok(Value::Bool(true)));
        assert_eq!(decode_hex("f6"), Ok(Value::Null));
        assert_eq!(decode_hex("f7"), Ok(Value::Undefined));
        assert_eq!(decode_hex("ea"), Ok(Value::Simple(10)));
        assert_eq!(decode_hex("f880"), Ok(Value::Simple(128)));
        assert_eq!(decode_hex("f93c00"), Ok(Value::Half(f16::from_f32(1.0))));
        assert_eq!(decode_hex("fa4048f5c3"), Ok(Value::Float(3.14)));
        assert_eq!(decode_hex("fb40091eb851eb851f"), Ok(Value::Double(3.14)));
    }

    #[test]
    fn two_byte_simple_below_32_is_rejected() {
        for n in 0_u8..32 {
            assert_eq!(
                Value::from_cbor(&[0xf8, n]),
                Err(DecodeError::InvalidHeader(0xf8)),
                "simple {n}"
            );
        }
        assert_eq!(decode_hex("f820"), Ok(Value::Simple(32)));
    }

    #[test]
    fn break_outside_indefinite_items_is_rejected() {
        assert_eq!(decode_hex("ff"), Err(DecodeError::WrongTypeInsideSequence));
        assert_eq!(decode_hex("81ff"), Err(DecodeError::WrongTypeInsideSequence));
        assert_eq!(decode_hex("a1ff01"), Err(DecodeError::WrongTypeInsideSequence));
        assert_eq!(decode_hex("a101ff"), Err(DecodeError::WrongTypeInsideSequence));
        assert_eq!(decode_hex("c1ff"), Err(DecodeError::WrongTypeInsideSequence));
        assert_eq!(decode_hex("d820ff"), Err(DecodeError::WrongTypeInsideSequence));
        assert_eq!(
            decode_hex("9f81ffff"),
            Err(DecodeError::WrongTypeInsideSequence)
        );
        assert_eq!(decode_hex("9f9fffff"), Ok(Value::Array(vec![Value::Array(vec![])])));
    }

    #[test]
    fn reserved_headers_are_rejected() {
        for byte in [0x1c_u8, 0x3f, 0x5c, 0x7e, 0x9d, 0xbe, 0xdf, 0xfc, 0x1f, 0xdc] {
            assert_eq!(
                Value::from_cbor(&[byte]),
                Err(DecodeError::InvalidHeader(byte)),
                "byte {byte:#04x}"
            );
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Strings
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn decodes_strings() {
        assert_eq!(decode_hex("6548656c6c6f"), Ok(Value::from("Hello")));
        assert_eq!(decode_hex("43001122"), Ok(Value::from(vec![0_u8, 0x11, 0x22])));
        assert_eq!(decode_hex("62c328"), Err(DecodeError::IncorrectUtf8String));
    }

    #[test]
    fn indefinite_strings_concatenate() {
        assert_eq!(
            decode_hex("5f42010243030405ff"),
            Ok(Value::from(vec![1_u8, 2, 3, 4, 5]))
        );
        assert_eq!(
            decode_hex("7f657374726561646d696e67ff"),
            Ok(Value::from("streaming"))
        );
    }

    #[test]
    fn indefinite_string_chunks_must_match() {
        assert_eq!(
            decode_hex("5f4101610aff"),
            Err(DecodeError::WrongTypeInsideSequence)
        );
        assert_eq!(
            decode_hex("7f6161410aff"),
            Err(DecodeError::WrongTypeInsideSequence)
        );
    }

    #[test]
    fn truncated_input() {
        assert_eq!(decode_hex(""), Err(DecodeError::UnfinishedSequence));
        assert_eq!(decode_hex("19"), Err(DecodeError::UnfinishedSequence));
        assert_eq!(decode_hex("45010203"), Err(DecodeError::UnfinishedSequence));
        assert_eq!(decode_hex("830102"), Err(DecodeError::UnfinishedSequence));
        assert_eq!(decode_hex("5f4101"), Err(DecodeError::UnfinishedSequence));
    }

    #[test]
    fn huge_declared_lengths_do_not_allocate() {
        assert_eq!(
            decode_hex("5bffffffffffffffff"),
            Err(DecodeError::TooLongSequence { len: u64::MAX })
        );
        assert_eq!(decode_hex("9b00000000ffffffff"), Err(DecodeError::UnfinishedSequence));
        assert_eq!(decode_hex("ba7fffffff"), Err(DecodeError::UnfinishedSequence));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Containers
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn decodes_arrays() {
        assert_eq!(
            decode_hex("83010203"),
            Ok(Value::Array(vec![1.into(), 2.into(), 3.into()]))
        );
        assert_eq!(
            decode_hex("9f0102ff"),
            Ok(Value::Array(vec![1.into(), 2.into()]))
        );
    }

    #[test]
    fn map_key_order_is_enforced() {
        let ok = decode_hex("a80a011864022003617a046261610581186406812007f408").unwrap();
        assert_eq!(ok.as_map().map(Map::len), Some(8));
        assert_eq!(
            decode_hex("a8f4080a011864022003617a046261610581186406812007"),
            Err(DecodeError::KeysOutOfOrder)
        );
        assert_eq!(
            decode_hex("a90a011864022003617a046261610581186406812007f408f408"),
            Err(DecodeError::DuplicateKey)
        );
    }

    #[test]
    fn ordered_keys_option_still_checks_order() {
        let options = DecodeOptions::default().with_ordered_keys(true);
        let v = Value::from_cbor_with(&hex::decode("a201020304").unwrap(), options.clone()).unwrap();
        assert!(v.as_ordered_map().is_some());
        assert_eq!(
            Value::from_cbor_with(&hex::decode("a203040102").unwrap(), options),
            Err(DecodeError::KeysOutOfOrder)
        );
    }

    #[test]
    fn indefinite_maps() {
        let v = decode_hex("bf01020304ff").unwrap();
        assert_eq!(v.as_map().map(Map::len), Some(2));
        assert_eq!(
            decode_hex("bf01ff"),
            Err(DecodeError::WrongTypeInsideSequence)
        );
    }

    #[test]
    fn non_minimal_duplicate_key_is_rejected() {
        // 1 and 1800 differ on the wire but name the same key
        assert_eq!(decode_hex("a20102180103"), Err(DecodeError::DuplicateKey));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tags and dates
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn epoch_dates() {
        assert_eq!(
            decode_hex("c11a6237c000"),
            Ok(Value::Date(Date::from_timestamp(1_647_820_800.0)))
        );
        assert_eq!(
            decode_hex("c13863"),
            Ok(Value::Date(Date::from_timestamp(-100.0)))
        );
        assert_eq!(
            decode_hex("c1fb3ff8000000000000"),
            Ok(Value::Date(Date::from_timestamp(1.5)))
        );
        assert_eq!(
            decode_hex("c16161"),
            Err(DecodeError::WrongTypeInsideSequence)
        );
    }

    #[test]
    fn day_count_dates() {
        assert_eq!(
            decode_hex("d86401"),
            Ok(Value::Date(Date::from_timestamp(86_400.0)))
        );
        assert_eq!(
            decode_hex("d86420"),
            Ok(Value::Date(Date::from_timestamp(-86_400.0)))
        );
        assert_eq!(
            decode_hex("d864f5"),
            Err(DecodeError::WrongTypeInsideSequence)
        );
        assert_eq!(
            decode_hex("d8641bffffffffffffffff"),
            Err(DecodeError::ValueOutOfRange)
        );
    }

    #[test]
    fn tags_resolve_names_through_registry() {
        let bytes = hex::decode("d8206161").unwrap();
        let plain = Value::from_cbor(&bytes).unwrap();
        assert_eq!(plain.as_tagged().and_then(|(t, _)| t.name()), None);

        let options = DecodeOptions::default().with_registry(Arc::new(TagRegistry::default()));
        let named = Value::from_cbor_with(&bytes, options).unwrap();
        assert_eq!(named.as_tagged().and_then(|(t, _)| t.name()), Some("uri"));
        assert_eq!(plain, named);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor behavior
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn trailing_bytes_rejected_by_from_cbor() {
        assert_eq!(decode_hex("0102"), Err(DecodeError::TrailingBytes));
    }

    #[test]
    fn decoder_reads_a_sequence() {
        let bytes = hex::decode("0102f6").unwrap();
        let mut decoder = Decoder::new(&bytes);
        assert_eq!(decoder.decode_item(), Ok(Value::Unsigned(1)));
        assert_eq!(decoder.decode_item(), Ok(Value::Unsigned(2)));
        assert_eq!(decoder.position(), 2);
        assert_eq!(decoder.decode_item(), Ok(Value::Null));
        assert!(decoder.is_empty());
        assert_eq!(decoder.decode_item(), Err(DecodeError::UnfinishedSequence));
    }

    #[test]
    fn depth_limit() {
        let mut bytes = vec![0x81_u8; 10];
        bytes.push(0x00);
        let options = DecodeOptions::default().with_max_depth(4);
        assert_eq!(
            Value::from_cbor_with(&bytes, options),
            Err(DecodeError::DepthLimitExceeded { limit: 4 })
        );
        assert!(Value::from_cbor(&bytes).is_ok());
    }
}
