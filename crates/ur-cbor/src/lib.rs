//! Deterministic CBOR codec for UR payloads.
//!
//! A closed [`Value`] model covering every RFC 8949 major type, with:
//! - canonical encoding (shortest heads, byte-lexicographic map keys)
//! - strict decoding that rejects unordered or duplicate map keys
//! - epoch dates under tag 1 and day-count dates under tag 100
//! - diagnostic notation and annotated hex dumps
//!
//! Half-precision floats decode but refuse to encode.
//!
//! ```
//! use ur_cbor::{Map, Value};
//!
//! let mut map = Map::new();
//! map.insert(1, "one");
//! let bytes = Value::from(map).to_cbor().unwrap();
//! assert_eq!(hex::encode(&bytes), "a101636f6e65");
//! assert_eq!(Value::from_cbor(&bytes).unwrap().diagnostic(), "{1: \"one\"}");
//! ```

#![forbid(unsafe_code)]

mod convert;
mod date;
mod decode;
mod diagnostic;
mod dump;
mod encode;
mod error;
mod map;
mod tag;
mod value;

pub use date::Date;
pub use decode::{DecodeOptions, Decoder};
pub use error::{DecodeError, EncodeError};
pub use map::{Map, OrderedMap};
pub use tag::{KNOWN_TAGS, Tag, TagRegistry};
pub use value::Value;
