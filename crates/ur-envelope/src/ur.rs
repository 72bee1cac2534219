//! Typed CBOR payload.

use std::fmt;
use std::str::FromStr;

use ur_cbor::Value;

use crate::decoder::UrDecoder;
use crate::encoder::UrEncoder;
use crate::error::UrError;

/// A CBOR payload labelled with a UR type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ur {
    ur_type: String,
    cbor: Vec<u8>,
}

/// True if `s` is a non-empty run of `[a-z0-9-]`.
#[must_use]
pub fn is_ur_type(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

impl Ur {
    /// Wrap already-encoded CBOR.
    ///
    /// # Errors
    ///
    /// Returns `UrError::InvalidType` if `ur_type` is not a valid UR type.
    pub fn new(ur_type: impl Into<String>, cbor: impl Into<Vec<u8>>) -> Result<Self, UrError> {
        let ur_type = ur_type.into();
        if !is_ur_type(&ur_type) {
            return Err(UrError::InvalidType);
        }
        Ok(Self {
            ur_type,
            cbor: cbor.into(),
        })
    }

    /// Encode `value` canonically and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `UrError::InvalidType` for a bad type and `UrError::Encode` if
    /// the value cannot be encoded.
    pub fn from_value(ur_type: impl Into<String>, value: &Value) -> Result<Self, UrError> {
        Self::new(ur_type, value.to_cbor()?)
    }

    /// The UR type.
    #[must_use]
    pub fn ur_type(&self) -> &str {
        &self.ur_type
    }

    /// The encoded payload.
    #[must_use]
    pub fn cbor(&self) -> &[u8] {
        &self.cbor
    }

    /// Decode the payload.
    ///
    /// # Errors
    ///
    /// Returns `UrError::Cbor` if the payload is not valid CBOR.
    pub fn to_value(&self) -> Result<Value, UrError> {
        Ok(Value::from_cbor(&self.cbor)?)
    }

    /// Require a specific type.
    ///
    /// # Errors
    ///
    /// Returns `UrError::UnexpectedType` on mismatch.
    pub fn check_type(&self, expected: &str) -> Result<(), UrError> {
        if self.ur_type == expected {
            Ok(())
        } else {
            Err(UrError::UnexpectedType {
                expected: expected.to_owned(),
                found: self.ur_type.clone(),
            })
        }
    }
}

impl fmt::Display for Ur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&UrEncoder::encode(self))
    }
}

impl FromStr for Ur {
    type Err = UrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UrDecoder::decode(s)
    }
}
