//! Type inference for untyped native values.
//!
//! When a native value carries no explicit hint, an [`InferenceStrategy`]
//! picks one. The default, [`Narrowest`], chooses the smallest hint that
//! holds the value exactly:
//!
//! ```rust
//! use serde_gbln::infer::{InferenceStrategy, Narrowest};
//! use serde_gbln::{IntKind, NativeValue, StrTier, TypeHint};
//!
//! let strategy = Narrowest;
//! assert_eq!(strategy.infer(&NativeValue::from(25)).unwrap(), TypeHint::Int(IntKind::I8));
//! assert_eq!(strategy.infer(&NativeValue::from(200)).unwrap(), TypeHint::Int(IntKind::U8));
//! assert_eq!(strategy.infer(&NativeValue::from(-200)).unwrap(), TypeHint::Int(IntKind::I16));
//! assert_eq!(
//!     strategy.infer(&NativeValue::from("Alice")).unwrap(),
//!     TypeHint::Str(StrTier::S8)
//! );
//! ```
//!
//! Inference only chooses hints; the allocator's constructors still validate
//! the value against whatever was chosen.

use crate::hint::{FloatKind, IntKind, StrTier, TypeHint};
use crate::native::{NativeValue, Number};
use crate::{Error, Result};

/// What inference decided for a native value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inferred {
    /// A leaf with this hint.
    Leaf(TypeHint),
    Object,
    Array,
}

/// A policy for choosing hints.
pub trait InferenceStrategy {
    /// Hint for an integer-valued number.
    fn integer(&self, value: i128) -> Result<IntKind>;

    /// Hint for a number that is not an exact integer.
    fn float(&self, value: f64) -> FloatKind {
        let _ = value;
        FloatKind::F64
    }

    /// Tier for a string of `len` UTF-8 bytes.
    fn string(&self, len: usize) -> Result<StrTier>;

    /// Classifies a native value. Explicit hints are returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::Length`] for strings over 1024 bytes
    /// - [`Error::Serialize`] for values with no GBLN mapping
    fn classify(&self, value: &NativeValue) -> Result<Inferred> {
        let hint = match value {
            NativeValue::Hinted(hint, _) => *hint,
            NativeValue::Undefined | NativeValue::Null => TypeHint::Null,
            NativeValue::Bool(_) => TypeHint::Bool,
            NativeValue::Number(n) => match n.as_exact_integer() {
                Some(i) => TypeHint::Int(self.integer(i)?),
                None => TypeHint::Float(self.float(n.as_f64())),
            },
            NativeValue::String(s) => TypeHint::Str(self.string(s.len())?),
            NativeValue::Object(_) => return Ok(Inferred::Object),
            NativeValue::Array(_) => return Ok(Inferred::Array),
            NativeValue::Opaque(kind) => {
                return Err(Error::serialize(format_args!(
                    "cannot serialize native value of type {}",
                    kind
                )))
            }
        };
        Ok(Inferred::Leaf(hint))
    }

    /// Hint for a leaf value.
    ///
    /// # Errors
    ///
    /// As [`InferenceStrategy::classify`], plus [`Error::Serialize`] for containers,
    /// which have no hint.
    fn infer(&self, value: &NativeValue) -> Result<TypeHint> {
        match self.classify(value)? {
            Inferred::Leaf(hint) => Ok(hint),
            Inferred::Object | Inferred::Array => {
                Err(Error::serialize("containers carry no type hint"))
            }
        }
    }
}

/// Smallest hint that holds the value. The default strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Narrowest;

impl InferenceStrategy for Narrowest {
    fn integer(&self, value: i128) -> Result<IntKind> {
        IntKind::ASCENDING
            .iter()
            .copied()
            .filter(|kind| value >= 0 || kind.is_signed())
            .find(|kind| kind.contains(value))
            .ok_or_else(|| out_of_range(value))
    }

    fn string(&self, len: usize) -> Result<StrTier> {
        StrTier::smallest_fitting(len).ok_or(Error::Length {
            len,
            limit: StrTier::MAX.limit(),
        })
    }
}

/// Widest hint of each family: `i64`, or `u64` above `i64::MAX`; `f64`; `s1024`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Widest;

impl InferenceStrategy for Widest {
    fn integer(&self, value: i128) -> Result<IntKind> {
        [IntKind::I64, IntKind::U64]
            .into_iter()
            .find(|kind| kind.contains(value))
            .ok_or_else(|| out_of_range(value))
    }

    fn string(&self, len: usize) -> Result<StrTier> {
        if StrTier::MAX.fits(len) {
            Ok(StrTier::MAX)
        } else {
            Err(Error::Length {
                len,
                limit: StrTier::MAX.limit(),
            })
        }
    }
}

// Native numbers are at most 64 bits wide, so this only fires for
// hand-built strategies feeding wider values.
fn out_of_range(value: i128) -> Error {
    Error::Range {
        hint: IntKind::U64.as_str().to_string(),
        value: value.to_string(),
        min: i128::from(i64::MIN),
        max: IntKind::U64.max(),
    }
}

/// Infers with the default strategy.
pub fn infer(value: &NativeValue) -> Result<TypeHint> {
    Narrowest.infer(value)
}

/// The exact integer a number denotes, or [`Error::Range`] when a float is
/// integral but past the safe-integer limit and so cannot be stored without
/// precision loss.
pub(crate) fn exact_integer(number: &Number, kind: IntKind) -> Result<i128> {
    if let Some(value) = number.as_exact_integer() {
        return Ok(value);
    }
    let f = number.as_f64();
    if f.is_finite() && f.fract() == 0.0 {
        return Err(Error::Range {
            hint: kind.as_str().to_string(),
            value: f.to_string(),
            min: kind.min(),
            max: kind.max(),
        });
    }
    Err(Error::TypeMismatch {
        expected: "integer",
        found: "float",
    })
}
