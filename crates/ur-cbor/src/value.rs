//! The structured value model.

use std::fmt;
use std::hash::{Hash, Hasher};

use half::f16;

use crate::date::Date;
use crate::map::{Map, OrderedMap};
use crate::tag::Tag;

/// A decoded or constructed CBOR data item.
///
/// Values are immutable once built. Equality is structural; floats compare by
/// bit pattern so that every value equals itself.
#[derive(Clone, Debug)]
pub enum Value {
    /// Major type 0.
    Unsigned(u64),
    /// Major type 1, stored as the magnitude `n` of `-1 - n`.
    Negative(u64),
    /// Major type 2.
    Bytes(Vec<u8>),
    /// Major type 3.
    Text(String),
    /// Major type 4.
    Array(Vec<Value>),
    /// Major type 5 with canonical key order.
    Map(Map),
    /// Major type 5 with insertion order.
    OrderedMap(OrderedMap),
    /// Major type 6.
    Tagged(Tag, Box<Value>),
    /// Simple value other than the booleans, null and undefined.
    Simple(u8),
    /// `true` / `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// `undefined`.
    Undefined,
    /// Half-precision float. Decode only.
    Half(f16),
    /// Single-precision float.
    Float(f32),
    /// Double-precision float.
    Double(f64),
    /// The indefinite-length stop code.
    Break,
    /// Epoch date (tag 1).
    Date(Date),
}

impl Value {
    /// Build a tagged value.
    #[must_use]
    pub fn tagged(tag: impl Into<Tag>, inner: impl Into<Value>) -> Self {
        Self::Tagged(tag.into(), Box::new(inner.into()))
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unsigned(_) => "unsigned",
            Self::Negative(_) => "negative",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::OrderedMap(_) => "ordered map",
            Self::Tagged(..) => "tagged",
            Self::Simple(_) => "simple",
            Self::Bool(_) => "bool",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Half(_) => "half",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Break => "break",
            Self::Date(_) => "date",
        }
    }

    /// Borrow byte-string contents.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Borrow text contents.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow array items.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow a canonical map.
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow an insertion-ordered map.
    #[must_use]
    pub fn as_ordered_map(&self) -> Option<&OrderedMap> {
        match self {
            Self::OrderedMap(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the tag and inner value.
    #[must_use]
    pub fn as_tagged(&self) -> Option<(&Tag, &Value)> {
        match self {
            Self::Tagged(tag, inner) => Some((tag, inner)),
            _ => None,
        }
    }

    /// Borrow the date.
    #[must_use]
    pub fn as_date(&self) -> Option<&Date> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    /// True for `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True if a half-precision float appears anywhere inside this value.
    #[must_use]
    pub fn contains_half(&self) -> bool {
        self.find(&|v| matches!(v, Self::Half(_))).is_some()
    }

    /// First value, depth first and this one included, matching `pred`.
    pub(crate) fn find(&self, pred: &impl Fn(&Self) -> bool) -> Option<&Self> {
        if pred(self) {
            return Some(self);
        }
        match self {
            Self::Array(items) => items.iter().find_map(|item| item.find(pred)),
            Self::Map(m) => m.iter().find_map(|(k, v)| k.find(pred).or_else(|| v.find(pred))),
            Self::OrderedMap(m) => m.iter().find_map(|(k, v)| k.find(pred).or_else(|| v.find(pred))),
            Self::Tagged(_, inner) => inner.find(pred),
            _ => None,
        }
    }

    fn discriminant(&self) -> u8 {
        match self {
            Self::Unsigned(_) => 0,
            Self::Negative(_) => 1,
            Self::Bytes(_) => 2,
            Self::Text(_) => 3,
            Self::Array(_) => 4,
            Self::Map(_) => 5,
            Self::OrderedMap(_) => 6,
            Self::Tagged(..) => 7,
            Self::Simple(_) => 8,
            Self::Bool(_) => 9,
            Self::Null => 10,
            Self::Undefined => 11,
            Self::Half(_) => 12,
            Self::Float(_) => 13,
            Self::Double(_) => 14,
            Self::Break => 15,
            Self::Date(_) => 16,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unsigned(a), Self::Unsigned(b))
            | (Self::Negative(a), Self::Negative(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::OrderedMap(a), Self::OrderedMap(b)) => a == b,
            (Self::Tagged(ta, a), Self::Tagged(tb, b)) => ta == tb && a == b,
            (Self::Simple(a), Self::Simple(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Null, Self::Null)
            | (Self::Undefined, Self::Undefined)
            | (Self::Break, Self::Break) => true,
            (Self::Half(a), Self::Half(b)) => a.to_bits() == b.to_bits(),
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Date(a), Self::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.discriminant().hash(state);
        match self {
            Self::Unsigned(n) | Self::Negative(n) => n.hash(state),
            Self::Bytes(b) => b.hash(state),
            Self::Text(s) => s.hash(state),
            Self::Array(items) => items.hash(state),
            Self::Map(m) => m.hash(state),
            Self::OrderedMap(m) => m.hash(state),
            Self::Tagged(tag, inner) => {
                tag.hash(state);
                inner.hash(state);
            }
            Self::Simple(n) => n.hash(state),
            Self::Bool(b) => b.hash(state),
            Self::Half(h) => h.to_bits().hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::Double(d) => d.to_bits().hash(state),
            Self::Date(d) => d.hash(state),
            Self::Null | Self::Undefined | Self::Break => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn floats_compare_by_bits() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Double(0.0), Value::Double(-0.0));
        assert_ne!(Value::Float(1.0), Value::Double(1.0));
    }

    #[test]
    fn tagged_equality_ignores_tag_name() {
        let a = Value::tagged(Tag::with_name(32, "uri"), "x");
        let b = Value::tagged(32, "x");
        assert_eq!(a, b);
    }

    #[test]
    fn values_hash_consistently() {
        let mut set = HashSet::new();
        set.insert(Value::from(1));
        set.insert(Value::from(1));
        set.insert(Value::from(-1));
        set.insert(Value::Double(f64::NAN));
        set.insert(Value::Double(f64::NAN));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn accessors() {
        let v = Value::from(vec![Value::from("a")]);
        assert_eq!(v.as_array().map(<[Value]>::len), Some(1));
        assert!(v.as_bytes().is_none());
        assert_eq!(Value::from("a").as_text(), Some("a"));
        assert_eq!(Value::from(&b"\x01"[..]).as_bytes(), Some(&[1_u8][..]));
        assert!(Value::Null.is_null());
        assert_eq!(Value::Null.kind(), "null");
    }

    #[test]
    fn contains_half_searches_nested_values() {
        let half = Value::Half(f16::from_f32(1.5));
        assert!(half.contains_half());
        assert!(Value::Array(vec![Value::from(1), half.clone()]).contains_half());
        assert!(Value::tagged(5, half).contains_half());
        assert!(!Value::Float(1.5).contains_half());
    }
}
