//! Luby-transform fountain encoding for multipart transport.
//!
//! A message is split into equal fragments. The encoder emits an endless
//! stream of parts: first each fragment on its own, then XOR mixes of
//! fragment subsets chosen deterministically from the sequence number and
//! message checksum. A decoder that sees enough parts, in any order and with
//! any losses, reconstructs the message and verifies its CRC-32.
//!
//! # Example
//!
//! ```
//! use ur_fountain::{FountainDecoder, FountainEncoder};
//!
//! let message = b"a message long enough to need several fragments";
//! let mut encoder = FountainEncoder::new(message, 10, 5, 0).unwrap();
//! let mut decoder = FountainDecoder::new();
//! while !decoder.is_complete() {
//!     decoder.receive_part(&encoder.next_part());
//! }
//! assert_eq!(decoder.message(), Some(&message[..]));
//! ```

#![forbid(unsafe_code)]

mod chooser;
mod config;
mod crc;
mod decoder;
mod encoder;
mod error;
mod fragment;
mod golden;
mod part;
mod sampler;
mod xoshiro;

pub use chooser::{FragmentChooser, choose_fragments};
pub use config::FountainConfig;
pub use crc::{crc32, crc32_bytes};
pub use decoder::{FountainDecoder, RejectionCallback};
pub use encoder::FountainEncoder;
pub use error::{DecodeError, EncodeError, PartError, RejectReason, SamplerError};
pub use fragment::{fragment_length, join_fragments, partition_message, xor_into};
pub use part::Part;
pub use sampler::RandomSampler;
pub use xoshiro::Xoshiro256;
