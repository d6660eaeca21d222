//! The typed value model.
//!
//! This module provides [`GoblinValue`], the tagged union stored in every node
//! of a value tree, together with the validated scalar payloads it carries:
//!
//! - [`Integer`]: an integer stored at exactly its declared width
//! - [`Float`]: an `f32` or `f64`
//! - [`BoundedStr`]: UTF-8 text paired with the tier that bounds it
//!
//! Containers hold [`Handle`]s to their children; the nodes themselves live in
//! an [`Allocator`](crate::Allocator).
//!
//! ## Validation
//!
//! Every constructor checks its input and never clamps or widens:
//!
//! ```rust
//! use serde_gbln::{BoundedStr, Integer, IntKind, StrTier};
//!
//! assert_eq!(Integer::new(IntKind::U8, 255).unwrap().value(), 255);
//! assert!(Integer::new(IntKind::U8, 256).is_err());
//!
//! let s = BoundedStr::new("Alice", None).unwrap();
//! assert_eq!(s.tier(), StrTier::S8);
//! assert!(BoundedStr::new("Alice", Some(StrTier::S4)).is_err());
//! ```

use crate::hint::{FloatKind, IntKind, StrTier, TypeHint, ValueType};
use crate::{Error, GoblinMap, Handle, Result};
use std::fmt;

/// An integer held at its declared width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Integer {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
}

impl Integer {
    /// Validates `raw` against `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] with the bounds of `kind` when `raw` does not fit.
    pub fn new(kind: IntKind, raw: i128) -> Result<Self> {
        let out_of_range = || Error::Range {
            hint: kind.as_str().to_string(),
            value: raw.to_string(),
            min: kind.min(),
            max: kind.max(),
        };
        let value = match kind {
            IntKind::I8 => Integer::I8(i8::try_from(raw).map_err(|_| out_of_range())?),
            IntKind::U8 => Integer::U8(u8::try_from(raw).map_err(|_| out_of_range())?),
            IntKind::I16 => Integer::I16(i16::try_from(raw).map_err(|_| out_of_range())?),
            IntKind::U16 => Integer::U16(u16::try_from(raw).map_err(|_| out_of_range())?),
            IntKind::I32 => Integer::I32(i32::try_from(raw).map_err(|_| out_of_range())?),
            IntKind::U32 => Integer::U32(u32::try_from(raw).map_err(|_| out_of_range())?),
            IntKind::I64 => Integer::I64(i64::try_from(raw).map_err(|_| out_of_range())?),
            IntKind::U64 => Integer::U64(u64::try_from(raw).map_err(|_| out_of_range())?),
        };
        Ok(value)
    }

    #[must_use]
    pub const fn kind(&self) -> IntKind {
        match self {
            Integer::I8(_) => IntKind::I8,
            Integer::U8(_) => IntKind::U8,
            Integer::I16(_) => IntKind::I16,
            Integer::U16(_) => IntKind::U16,
            Integer::I32(_) => IntKind::I32,
            Integer::U32(_) => IntKind::U32,
            Integer::I64(_) => IntKind::I64,
            Integer::U64(_) => IntKind::U64,
        }
    }

    /// The exact value, widened losslessly to `i128`.
    #[must_use]
    pub const fn value(&self) -> i128 {
        match *self {
            Integer::I8(v) => v as i128,
            Integer::U8(v) => v as i128,
            Integer::I16(v) => v as i128,
            Integer::U16(v) => v as i128,
            Integer::I32(v) => v as i128,
            Integer::U32(v) => v as i128,
            Integer::I64(v) => v as i128,
            Integer::U64(v) => v as i128,
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A float held at its declared width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Float {
    F32(f32),
    F64(f64),
}

impl Float {
    /// Stores `raw` at `kind`'s width. `F32` rounds exactly as a single-precision store.
    #[must_use]
    pub fn new(kind: FloatKind, raw: f64) -> Self {
        match kind {
            FloatKind::F32 => Float::F32(raw as f32),
            FloatKind::F64 => Float::F64(raw),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FloatKind {
        match self {
            Float::F32(_) => FloatKind::F32,
            Float::F64(_) => FloatKind::F64,
        }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        match *self {
            Float::F32(v) => f64::from(v),
            Float::F64(v) => v,
        }
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display of each width is the shortest text that reads back to the same bits.
        match self {
            Float::F32(v) => write!(f, "{}", v),
            Float::F64(v) => write!(f, "{}", v),
        }
    }
}

/// UTF-8 text bounded by a string tier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoundedStr {
    tier: StrTier,
    text: String,
}

impl BoundedStr {
    /// Bounds `text` by `tier`, or by the smallest fitting tier when `tier` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Length`] when the text is longer than the requested tier,
    /// or longer than 1024 bytes when no tier is requested. A larger tier that
    /// would fit is never substituted for an explicit one.
    pub fn new(text: impl Into<String>, tier: Option<StrTier>) -> Result<Self> {
        let text = text.into();
        let len = text.len();
        let tier = match tier {
            Some(tier) if tier.fits(len) => tier,
            Some(tier) => {
                return Err(Error::Length {
                    len,
                    limit: tier.limit(),
                })
            }
            None => StrTier::smallest_fitting(len).ok_or(Error::Length {
                len,
                limit: StrTier::MAX.limit(),
            })?,
        };
        Ok(BoundedStr { tier, text })
    }

    #[must_use]
    pub const fn tier(&self) -> StrTier {
        self.tier
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

/// The tagged union stored in each node of a value tree.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum GoblinValue {
    Integer(Integer),
    Float(Float),
    Str(BoundedStr),
    Bool(bool),
    #[default]
    Null,
    Object(GoblinMap),
    Array(Vec<Handle>),
}

impl GoblinValue {
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            GoblinValue::Integer(_) => ValueType::Integer,
            GoblinValue::Float(_) => ValueType::Float,
            GoblinValue::Str(_) => ValueType::String,
            GoblinValue::Bool(_) => ValueType::Boolean,
            GoblinValue::Null => ValueType::Null,
            GoblinValue::Object(_) => ValueType::Object,
            GoblinValue::Array(_) => ValueType::Array,
        }
    }

    /// The hint a leaf carries; `None` for containers.
    #[must_use]
    pub fn hint(&self) -> Option<TypeHint> {
        match self {
            GoblinValue::Integer(i) => Some(TypeHint::Int(i.kind())),
            GoblinValue::Float(f) => Some(TypeHint::Float(f.kind())),
            GoblinValue::Str(s) => Some(TypeHint::Str(s.tier())),
            GoblinValue::Bool(_) => Some(TypeHint::Bool),
            GoblinValue::Null => Some(TypeHint::Null),
            GoblinValue::Object(_) | GoblinValue::Array(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, GoblinValue::Object(_) | GoblinValue::Array(_))
    }

    /// Handles of the direct children, in order.
    pub(crate) fn children(&self) -> Vec<Handle> {
        match self {
            GoblinValue::Object(map) => map.values().copied().collect(),
            GoblinValue::Array(items) => items.clone(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn mismatch(&self, expected: ValueType) -> Error {
        Error::TypeMismatch {
            expected: expected.as_str(),
            found: self.value_type().as_str(),
        }
    }
}
