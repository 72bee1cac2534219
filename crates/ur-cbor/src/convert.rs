//! Conversions into [`Value`] and typed extraction out of it.

use crate::date::Date;
use crate::error::DecodeError;
use crate::map::{Map, OrderedMap};
use crate::value::Value;

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Self::Unsigned(u64::from(n))
            }
        }
    )*};
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(n: $t) -> Self {
                let n = i64::from(n);
                if n < 0 {
                    // -1 - n, computed without overflow
                    #[allow(clippy::cast_sign_loss)]
                    Self::Negative(!n as u64)
                } else {
                    #[allow(clippy::cast_sign_loss)]
                    Self::Unsigned(n as u64)
                }
            }
        }
    )*};
}

from_unsigned!(u8, u16, u32, u64);
from_signed!(i8, i16, i32, i64);

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Unsigned(n as u64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::Float(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Double(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Self::Map(m)
    }
}

impl From<OrderedMap> for Value {
    fn from(m: OrderedMap) -> Self {
        Self::OrderedMap(m)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Self::Date(d)
    }
}

const fn mismatch(expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

/// Widest integer view of an integer value.
fn integer(value: &Value) -> Result<i128, DecodeError> {
    match value {
        Value::Unsigned(n) => Ok(i128::from(*n)),
        Value::Negative(n) => Ok(-1 - i128::from(*n)),
        other => Err(mismatch("integer", other)),
    }
}

macro_rules! try_integer {
    ($($t:ty),*) => {$(
        impl TryFrom<&Value> for $t {
            type Error = DecodeError;

            fn try_from(value: &Value) -> Result<Self, Self::Error> {
                <$t>::try_from(integer(value)?).map_err(|_| DecodeError::ValueOutOfRange)
            }
        }

        impl TryFrom<Value> for $t {
            type Error = DecodeError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                <$t>::try_from(&value)
            }
        }
    )*};
}

try_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64);

impl TryFrom<&Value> for i128 {
    type Error = DecodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        integer(value)
    }
}

impl TryFrom<&Value> for bool {
    type Error = DecodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }
}

impl TryFrom<&Value> for f64 {
    type Error = DecodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Half(h) => Ok(h.to_f64()),
            Value::Float(f) => Ok(f64::from(*f)),
            Value::Double(d) => Ok(*d),
            other => Err(mismatch("float", other)),
        }
    }
}

impl TryFrom<&Value> for String {
    type Error = DecodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_text()
            .map(str::to_owned)
            .ok_or_else(|| mismatch("text", value))
    }
}

impl TryFrom<Value> for String {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl TryFrom<&Value> for Vec<u8> {
    type Error = DecodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| mismatch("bytes", value))
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(mismatch("bytes", &other)),
        }
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => Ok(items),
            other => Err(mismatch("array", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_conversion_uses_magnitude_form() {
        assert_eq!(Value::from(-1), Value::Negative(0));
        assert_eq!(Value::from(-1000), Value::Negative(999));
        assert_eq!(Value::from(i64::MIN), Value::Negative(i64::MAX as u64));
        assert_eq!(Value::from(7_i8), Value::Unsigned(7));
    }

    #[test]
    fn integer_extraction_checks_range() {
        assert_eq!(u8::try_from(&Value::from(255)), Ok(255));
        assert_eq!(
            u8::try_from(&Value::from(256)),
            Err(DecodeError::ValueOutOfRange)
        );
        assert_eq!(
            u64::try_from(&Value::from(-1)),
            Err(DecodeError::ValueOutOfRange)
        );
        assert_eq!(i64::try_from(&Value::Negative(u64::MAX)), Err(DecodeError::ValueOutOfRange));
        assert_eq!(i128::try_from(&Value::Negative(u64::MAX)), Ok(-1 - i128::from(u64::MAX)));
        assert_eq!(i32::try_from(Value::from(-5)), Ok(-5));
    }

    #[test]
    fn extraction_rejects_wrong_variant() {
        assert_eq!(
            u32::try_from(&Value::from("7")),
            Err(DecodeError::TypeMismatch {
                expected: "integer",
                found: "text",
            })
        );
        assert!(matches!(
            bool::try_from(&Value::Null),
            Err(DecodeError::TypeMismatch { found: "null", .. })
        ));
        assert!(String::try_from(Value::from(vec![1_u8])).is_err());
        assert!(Vec::<u8>::try_from(&Value::from("x")).is_err());
    }

    #[test]
    fn float_extraction_widens() {
        assert_eq!(f64::try_from(&Value::Float(1.5)), Ok(1.5));
        assert_eq!(
            f64::try_from(&Value::Half(half::f16::from_f32(0.5))),
            Ok(0.5)
        );
        assert!(f64::try_from(&Value::from(1)).is_err());
    }

    #[test]
    fn owned_extraction() {
        assert_eq!(String::try_from(Value::from("hi")), Ok("hi".to_string()));
        assert_eq!(Vec::<u8>::try_from(Value::from(vec![1_u8, 2])), Ok(vec![1, 2]));
        assert_eq!(
            Vec::<Value>::try_from(Value::Array(vec![Value::Null])),
            Ok(vec![Value::Null])
        );
    }
}
