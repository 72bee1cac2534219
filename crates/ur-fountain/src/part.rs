//! Fountain part and its CBOR wire form.
//!
//! A part encodes as the five-element array
//! `[seq_num, seq_len, message_len, checksum, data]`, with the first four as
//! unsigned integers no larger than `u32::MAX` and `data` as a byte string.

use std::fmt;

use ur_cbor::Value;

use crate::error::PartError;

/// One emitted fountain part.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Part {
    seq_num: u32,
    seq_len: usize,
    message_len: usize,
    checksum: u32,
    data: Vec<u8>,
}

impl Part {
    /// Assemble a part from its header fields and fragment data.
    ///
    /// No consistency checks are made here; decoders validate on receipt.
    #[must_use]
    pub const fn new(
        seq_num: u32,
        seq_len: usize,
        message_len: usize,
        checksum: u32,
        data: Vec<u8>,
    ) -> Self {
        Self {
            seq_num,
            seq_len,
            message_len,
            checksum,
            data,
        }
    }

    /// Sequence number, starting at 1.
    #[must_use]
    pub const fn seq_num(&self) -> u32 {
        self.seq_num
    }

    /// Fragment count of the message.
    #[must_use]
    pub const fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Unpadded message length.
    #[must_use]
    pub const fn message_len(&self) -> usize {
        self.message_len
    }

    /// CRC-32 of the whole message.
    #[must_use]
    pub const fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Fragment payload, possibly a XOR of several fragments.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the part, returning its payload.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// `"<seq_num>-<seq_len>"`, as used in multipart URs.
    #[must_use]
    pub fn seq_id(&self) -> String {
        format!("{}-{}", self.seq_num, self.seq_len)
    }

    /// CBOR value of this part.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::from(self.seq_num),
            Value::from(self.seq_len),
            Value::from(self.message_len),
            Value::from(self.checksum),
            Value::Bytes(self.data.clone()),
        ])
    }

    /// Encode as CBOR bytes.
    ///
    /// # Errors
    ///
    /// Propagates `PartError::Encode` from the codec.
    pub fn to_cbor(&self) -> Result<Vec<u8>, PartError> {
        Ok(self.to_value().to_cbor()?)
    }

    /// Decode from CBOR bytes.
    ///
    /// # Errors
    ///
    /// Returns `PartError::Cbor` for malformed CBOR and
    /// `PartError::InvalidPartHeader` when the value is not a well-formed part.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, PartError> {
        Self::from_value(&Value::from_cbor(bytes)?)
    }

    /// Build a part from a decoded CBOR value.
    ///
    /// # Errors
    ///
    /// Returns `PartError::InvalidPartHeader` when the value is not a
    /// well-formed part.
    pub fn from_value(value: &Value) -> Result<Self, PartError> {
        let items = value.as_array().ok_or(PartError::InvalidPartHeader {
            reason: "expected an array",
        })?;
        let [seq_num, seq_len, message_len, checksum, data] = items else {
            return Err(PartError::InvalidPartHeader {
                reason: "expected 5 elements",
            });
        };

        let seq_num = header_u32(
            seq_num,
            "sequence number must be an unsigned integer",
            "sequence number exceeds 32 bits",
        )?;
        let seq_len = header_u32(
            seq_len,
            "sequence length must be an unsigned integer",
            "sequence length exceeds 32 bits",
        )?;
        let message_len = header_u32(
            message_len,
            "message length must be an unsigned integer",
            "message length exceeds 32 bits",
        )?;
        let checksum = header_u32(
            checksum,
            "checksum must be an unsigned integer",
            "checksum exceeds 32 bits",
        )?;
        let data = data.as_bytes().ok_or(PartError::InvalidPartHeader {
            reason: "fragment data must be a byte string",
        })?;

        if seq_num == 0 {
            return Err(PartError::InvalidPartHeader {
                reason: "sequence number is zero",
            });
        }
        if seq_len == 0 {
            return Err(PartError::InvalidPartHeader {
                reason: "sequence length is zero",
            });
        }
        if message_len == 0 {
            return Err(PartError::InvalidPartHeader {
                reason: "message length is zero",
            });
        }
        if data.is_empty() {
            return Err(PartError::InvalidPartHeader {
                reason: "fragment data is empty",
            });
        }

        Ok(Self::new(
            seq_num,
            seq_len as usize,
            message_len as usize,
            checksum,
            data.to_vec(),
        ))
    }
}

fn header_u32(
    value: &Value,
    not_unsigned: &'static str,
    too_large: &'static str,
) -> Result<u32, PartError> {
    let Value::Unsigned(n) = value else {
        return Err(PartError::InvalidPartHeader {
            reason: not_unsigned,
        });
    };
    u32::try_from(*n).map_err(|_| PartError::InvalidPartHeader { reason: too_large })
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seqNum:{}, seqLen:{}, messageLen:{}, checksum:{}, data:{}",
            self.seq_num,
            self.seq_len,
            self.message_len,
            self.checksum,
            hex::encode(&self.data)
        )
    }
}
