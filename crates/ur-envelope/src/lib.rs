//! Uniform Resources: typed CBOR payloads as `ur:` strings.
//!
//! A [`Ur`] pairs a type such as `bytes` with a CBOR payload. Small payloads
//! travel as one string, `ur:<type>/<bytewords>`. Larger ones are split by the
//! fountain encoder into `ur:<type>/<seq_num>-<seq_len>/<bytewords>` parts that
//! a [`UrDecoder`] reassembles in any order.
//!
//! # Example
//!
//! ```
//! use ur_envelope::{Ur, UrDecoder, UrEncoder};
//!
//! let payload = ur_cbor::Value::from(vec![0_u8; 300]);
//! let ur = Ur::from_value("bytes", &payload).unwrap();
//!
//! let mut encoder = UrEncoder::new(ur.clone(), 100, 10, 0).unwrap();
//! let mut decoder = UrDecoder::new();
//! while !decoder.is_complete() {
//!     decoder.receive_part(&encoder.next_part().unwrap()).unwrap();
//! }
//! assert_eq!(decoder.into_result(), Some(Ok(ur)));
//! ```

#![forbid(unsafe_code)]

pub mod bytewords;
mod decoder;
mod encoder;
mod error;
mod transcribe;
mod ur;
mod uri;

pub use bytewords::Style;
pub use decoder::UrDecoder;
pub use encoder::UrEncoder;
pub use error::{BytewordsError, UrError};
pub use transcribe::{Bytewords, Transcriber};
pub use ur::{Ur, is_ur_type};
pub use uri::UrFrame;
