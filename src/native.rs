//! Native dynamic values: the host-side counterpart of a GBLN tree.
//!
//! [`NativeValue`] models the loosely typed values of a calling environment.
//! Containers are shared (`Rc<RefCell<..>>`), so a host graph may alias a
//! container or even contain itself; the converter detects such cycles.
//!
//! ```rust
//! use serde_gbln::{NativeValue, Number};
//!
//! let user = NativeValue::object([
//!     ("id", NativeValue::from(12345)),
//!     ("name", NativeValue::from("Alice")),
//! ]);
//! assert_eq!(user.get("id"), Some(NativeValue::Number(Number::Int(12345))));
//! ```

use crate::hint::TypeHint;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Insertion-ordered map used by native objects.
pub type NativeMap = IndexMap<String, NativeValue>;

/// Shared, mutable native array.
pub type NativeArray = Rc<RefCell<Vec<NativeValue>>>;

/// Shared, mutable native object.
pub type NativeObject = Rc<RefCell<NativeMap>>;

/// Largest integer a host using `f64` numbers can represent exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A native number.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    /// The exact integer this number denotes, if it denotes one.
    ///
    /// Floats qualify only when integral, finite, and within the safe-integer
    /// limit; beyond it the float no longer identifies a single integer.
    ///
    /// ```rust
    /// use serde_gbln::Number;
    ///
    /// assert_eq!(Number::Float(42.0).as_exact_integer(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_exact_integer(), None);
    /// assert_eq!(Number::Float(1e17).as_exact_integer(), None);
    /// assert_eq!(Number::UInt(u64::MAX).as_exact_integer(), Some(u64::MAX as i128));
    /// ```
    #[must_use]
    pub fn as_exact_integer(&self) -> Option<i128> {
        match *self {
            Number::Int(i) => Some(i128::from(i)),
            Number::UInt(u) => Some(i128::from(u)),
            Number::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
                    Some(f as i128)
                } else {
                    None
                }
            }
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::UInt(u) => u as f64,
            Number::Float(f) => f,
        }
    }

    /// Builds the narrowest native number holding `value`.
    #[must_use]
    pub fn from_i128(value: i128) -> Self {
        if let Ok(i) = i64::try_from(value) {
            Number::Int(i)
        } else if let Ok(u) = u64::try_from(value) {
            Number::UInt(u)
        } else {
            Number::Float(value as f64)
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_exact_integer(), other.as_exact_integer()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.as_f64() == other.as_f64(),
            _ => false,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::UInt(u) => write!(f, "{}", u),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

/// A dynamically-typed host value.
#[derive(Clone, Debug, Default)]
pub enum NativeValue {
    /// A missing value; converts to GBLN null.
    Undefined,
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(NativeArray),
    Object(NativeObject),
    /// A value with an explicit type hint that inference must not override.
    Hinted(TypeHint, Box<NativeValue>),
    /// A host value with no GBLN mapping, named by its host type.
    Opaque(String),
}

impl NativeValue {
    pub fn array(items: impl IntoIterator<Item = NativeValue>) -> Self {
        NativeValue::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, NativeValue)>) -> Self {
        NativeValue::Object(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    #[must_use]
    pub fn hinted(hint: TypeHint, value: NativeValue) -> Self {
        NativeValue::Hinted(hint, Box::new(value))
    }

    /// The value with any explicit hint stripped off.
    #[must_use]
    pub fn unhinted(&self) -> &NativeValue {
        match self {
            NativeValue::Hinted(_, inner) => inner.unhinted(),
            other => other,
        }
    }

    /// Host-facing name of the value's type, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            NativeValue::Undefined => "undefined",
            NativeValue::Null => "null",
            NativeValue::Bool(_) => "boolean",
            NativeValue::Number(_) => "number",
            NativeValue::String(_) => "string",
            NativeValue::Array(_) => "array",
            NativeValue::Object(_) => "object",
            NativeValue::Hinted(_, inner) => inner.type_name(),
            NativeValue::Opaque(_) => "opaque",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.unhinted(), NativeValue::Null | NativeValue::Undefined)
    }

    #[inline]
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.unhinted(), NativeValue::Object(_))
    }

    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.unhinted(), NativeValue::Array(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.unhinted() {
            NativeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self.unhinted() {
            NativeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number()
            .and_then(|n| n.as_exact_integer())
            .and_then(|i| i64::try_from(i).ok())
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(|n| n.as_f64())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self.unhinted() {
            NativeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up `key` in an object, cloning the member (containers stay shared).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<NativeValue> {
        match self.unhinted() {
            NativeValue::Object(obj) => obj.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Returns the element at `index` of an array.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<NativeValue> {
        match self.unhinted() {
            NativeValue::Array(arr) => arr.borrow().get(index).cloned(),
            _ => None,
        }
    }

    /// Number of members of an object or elements of an array.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self.unhinted() {
            NativeValue::Array(arr) => Some(arr.borrow().len()),
            NativeValue::Object(obj) => Some(obj.borrow().len()),
            _ => None,
        }
    }

    /// Sets `key` on an object in place. Returns `false` if this is not an object.
    pub fn set(&self, key: impl Into<String>, value: NativeValue) -> bool {
        match self.unhinted() {
            NativeValue::Object(obj) => {
                obj.borrow_mut().insert(key.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Appends to an array in place. Returns `false` if this is not an array.
    pub fn push(&self, value: NativeValue) -> bool {
        match self.unhinted() {
            NativeValue::Array(arr) => {
                arr.borrow_mut().push(value);
                true
            }
            _ => false,
        }
    }
}

/// Structural equality. Hints are ignored, `Undefined` equals `Null`, and
/// integers compare by value whatever their native representation.
///
/// Comparing a cyclic graph recurses without bound.
impl PartialEq for NativeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self.unhinted(), other.unhinted()) {
            (
                NativeValue::Null | NativeValue::Undefined,
                NativeValue::Null | NativeValue::Undefined,
            ) => true,
            (NativeValue::Bool(a), NativeValue::Bool(b)) => a == b,
            (NativeValue::Number(a), NativeValue::Number(b)) => a == b,
            (NativeValue::String(a), NativeValue::String(b)) => a == b,
            (NativeValue::Array(a), NativeValue::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (NativeValue::Object(a), NativeValue::Object(b)) => {
                // IndexMap equality ignores order; GBLN objects do not.
                Rc::ptr_eq(a, b) || a.borrow().iter().eq(b.borrow().iter())
            }
            (NativeValue::Opaque(a), NativeValue::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        NativeValue::Bool(value)
    }
}

impl From<i8> for NativeValue {
    fn from(value: i8) -> Self {
        NativeValue::Number(Number::Int(i64::from(value)))
    }
}

impl From<i16> for NativeValue {
    fn from(value: i16) -> Self {
        NativeValue::Number(Number::Int(i64::from(value)))
    }
}

impl From<i32> for NativeValue {
    fn from(value: i32) -> Self {
        NativeValue::Number(Number::Int(i64::from(value)))
    }
}

impl From<i64> for NativeValue {
    fn from(value: i64) -> Self {
        NativeValue::Number(Number::Int(value))
    }
}

impl From<u8> for NativeValue {
    fn from(value: u8) -> Self {
        NativeValue::Number(Number::UInt(u64::from(value)))
    }
}

impl From<u16> for NativeValue {
    fn from(value: u16) -> Self {
        NativeValue::Number(Number::UInt(u64::from(value)))
    }
}

impl From<u32> for NativeValue {
    fn from(value: u32) -> Self {
        NativeValue::Number(Number::UInt(u64::from(value)))
    }
}

impl From<u64> for NativeValue {
    fn from(value: u64) -> Self {
        NativeValue::Number(Number::UInt(value))
    }
}

impl From<f32> for NativeValue {
    fn from(value: f32) -> Self {
        NativeValue::Number(Number::Float(f64::from(value)))
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        NativeValue::Number(Number::Float(value))
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        NativeValue::String(value)
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        NativeValue::String(value.to_string())
    }
}

impl<T: Into<NativeValue>> From<Vec<T>> for NativeValue {
    fn from(value: Vec<T>) -> Self {
        NativeValue::array(value.into_iter().map(Into::into))
    }
}

impl From<NativeMap> for NativeValue {
    fn from(value: NativeMap) -> Self {
        NativeValue::Object(Rc::new(RefCell::new(value)))
    }
}

impl<T: Into<NativeValue>> From<Option<T>> for NativeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(NativeValue::Null, Into::into)
    }
}

/// Serializes the value graph. Hints are dropped; opaque values fail.
///
/// A cyclic graph recurses without bound; convert it with
/// [`Converter`](crate::Converter) to get a `circular reference` error instead.
impl Serialize for NativeValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            NativeValue::Undefined | NativeValue::Null => serializer.serialize_unit(),
            NativeValue::Bool(b) => serializer.serialize_bool(*b),
            NativeValue::Number(Number::Int(i)) => serializer.serialize_i64(*i),
            NativeValue::Number(Number::UInt(u)) => serializer.serialize_u64(*u),
            NativeValue::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            NativeValue::String(s) => serializer.serialize_str(s),
            NativeValue::Array(arr) => {
                use serde::ser::SerializeSeq;
                let arr = arr.borrow();
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr.iter() {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            NativeValue::Object(obj) => {
                use serde::ser::SerializeMap;
                let obj = obj.borrow();
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            NativeValue::Hinted(_, inner) => inner.serialize(serializer),
            NativeValue::Opaque(kind) => Err(serde::ser::Error::custom(format!(
                "cannot serialize native value of type {}",
                kind
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for NativeValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct NativeValueVisitor;

        impl<'de> Visitor<'de> for NativeValueVisitor {
            type Value = NativeValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value representable in GBLN")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(NativeValue::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(NativeValue::Number(Number::Int(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(NativeValue::Number(Number::UInt(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(NativeValue::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(NativeValue::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(NativeValue::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(NativeValue::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(NativeValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(NativeValue::array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = NativeMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(NativeValue::from(values))
            }
        }

        deserializer.deserialize_any(NativeValueVisitor)
    }
}
