//! Type hints: the width and bound annotations carried by every GBLN leaf.
//!
//! | Hint | Meaning |
//! |------|---------|
//! | `i8` `i16` `i32` `i64` | signed integer of that width |
//! | `u8` `u16` `u32` `u64` | unsigned integer of that width |
//! | `f32` `f64` | IEEE-754 float |
//! | `s2` ... `s1024` | UTF-8 string of at most that many bytes |
//! | `b` | boolean |
//! | `n` | null |
//!
//! ```rust
//! use serde_gbln::{IntKind, StrTier, TypeHint};
//!
//! let hint: TypeHint = "s64".parse().unwrap();
//! assert_eq!(hint, TypeHint::Str(StrTier::S64));
//! assert_eq!(IntKind::U8.max(), 255);
//! assert!("s65".parse::<TypeHint>().is_err());
//! ```

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Integer width and signedness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl IntKind {
    /// Every kind, narrowest first, signed before unsigned at each width.
    pub const ASCENDING: [IntKind; 8] = [
        IntKind::I8,
        IntKind::U8,
        IntKind::I16,
        IntKind::U16,
        IntKind::I32,
        IntKind::U32,
        IntKind::I64,
        IntKind::U64,
    ];

    /// Builds a kind from a bit width and signedness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTypeHint`] for widths other than 8, 16, 32 and 64.
    pub fn from_parts(width: u8, signed: bool) -> Result<Self> {
        match (width, signed) {
            (8, true) => Ok(IntKind::I8),
            (8, false) => Ok(IntKind::U8),
            (16, true) => Ok(IntKind::I16),
            (16, false) => Ok(IntKind::U16),
            (32, true) => Ok(IntKind::I32),
            (32, false) => Ok(IntKind::U32),
            (64, true) => Ok(IntKind::I64),
            (64, false) => Ok(IntKind::U64),
            _ => Err(Error::InvalidTypeHint(format!(
                "{}{}",
                if signed { 'i' } else { 'u' },
                width
            ))),
        }
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        match self {
            IntKind::I8 | IntKind::U8 => 8,
            IntKind::I16 | IntKind::U16 => 16,
            IntKind::I32 | IntKind::U32 => 32,
            IntKind::I64 | IntKind::U64 => 64,
        }
    }

    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(self, IntKind::I8 | IntKind::I16 | IntKind::I32 | IntKind::I64)
    }

    #[must_use]
    pub const fn min(&self) -> i128 {
        match self {
            IntKind::I8 => i8::MIN as i128,
            IntKind::I16 => i16::MIN as i128,
            IntKind::I32 => i32::MIN as i128,
            IntKind::I64 => i64::MIN as i128,
            IntKind::U8 | IntKind::U16 | IntKind::U32 | IntKind::U64 => 0,
        }
    }

    #[must_use]
    pub const fn max(&self) -> i128 {
        match self {
            IntKind::I8 => i8::MAX as i128,
            IntKind::U8 => u8::MAX as i128,
            IntKind::I16 => i16::MAX as i128,
            IntKind::U16 => u16::MAX as i128,
            IntKind::I32 => i32::MAX as i128,
            IntKind::U32 => u32::MAX as i128,
            IntKind::I64 => i64::MAX as i128,
            IntKind::U64 => u64::MAX as i128,
        }
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, value: i128) -> bool {
        value >= self.min() && value <= self.max()
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::U8 => "u8",
            IntKind::I16 => "i16",
            IntKind::U16 => "u16",
            IntKind::I32 => "i32",
            IntKind::U32 => "u32",
            IntKind::I64 => "i64",
            IntKind::U64 => "u64",
        }
    }
}

/// Float width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FloatKind::F32 => "f32",
            FloatKind::F64 => "f64",
        }
    }
}

/// Maximum byte length of a bounded string. Only the fixed tiers exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrTier(u16);

impl StrTier {
    pub const S2: StrTier = StrTier(2);
    pub const S4: StrTier = StrTier(4);
    pub const S8: StrTier = StrTier(8);
    pub const S16: StrTier = StrTier(16);
    pub const S32: StrTier = StrTier(32);
    pub const S64: StrTier = StrTier(64);
    pub const S128: StrTier = StrTier(128);
    pub const S256: StrTier = StrTier(256);
    pub const S512: StrTier = StrTier(512);
    pub const S1024: StrTier = StrTier(1024);

    /// All tiers in ascending order.
    pub const ALL: [StrTier; 10] = [
        StrTier::S2,
        StrTier::S4,
        StrTier::S8,
        StrTier::S16,
        StrTier::S32,
        StrTier::S64,
        StrTier::S128,
        StrTier::S256,
        StrTier::S512,
        StrTier::S1024,
    ];

    pub const MAX: StrTier = StrTier::S1024;

    /// Looks up the tier with exactly this limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTypeHint`] when `limit` is not one of the tiers.
    pub fn new(limit: usize) -> Result<Self> {
        StrTier::ALL
            .iter()
            .copied()
            .find(|tier| tier.limit() == limit)
            .ok_or_else(|| Error::InvalidTypeHint(format!("s{}", limit)))
    }

    /// Smallest tier that holds `len` bytes, or `None` above 1024.
    #[must_use]
    pub fn smallest_fitting(len: usize) -> Option<Self> {
        StrTier::ALL.iter().copied().find(|tier| tier.fits(len))
    }

    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn fits(&self, len: usize) -> bool {
        len <= self.0 as usize
    }
}

impl fmt::Display for StrTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// The full set of hints a GBLN leaf may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeHint {
    Int(IntKind),
    Float(FloatKind),
    Str(StrTier),
    Bool,
    Null,
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Int(kind) => f.write_str(kind.as_str()),
            TypeHint::Float(kind) => f.write_str(kind.as_str()),
            TypeHint::Str(tier) => write!(f, "{}", tier),
            TypeHint::Bool => f.write_str("b"),
            TypeHint::Null => f.write_str("n"),
        }
    }
}

impl FromStr for TypeHint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hint = match s {
            "i8" => TypeHint::Int(IntKind::I8),
            "i16" => TypeHint::Int(IntKind::I16),
            "i32" => TypeHint::Int(IntKind::I32),
            "i64" => TypeHint::Int(IntKind::I64),
            "u8" => TypeHint::Int(IntKind::U8),
            "u16" => TypeHint::Int(IntKind::U16),
            "u32" => TypeHint::Int(IntKind::U32),
            "u64" => TypeHint::Int(IntKind::U64),
            "f32" => TypeHint::Float(FloatKind::F32),
            "f64" => TypeHint::Float(FloatKind::F64),
            "b" => TypeHint::Bool,
            "n" => TypeHint::Null,
            _ => {
                let limit = s
                    .strip_prefix('s')
                    .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
                    .and_then(|digits| digits.parse::<usize>().ok())
                    .ok_or_else(|| Error::InvalidTypeHint(s.to_string()))?;
                TypeHint::Str(StrTier::new(limit)?)
            }
        };
        Ok(hint)
    }
}

/// The variant of a node, as reported by `Allocator::type_of`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Float,
    String,
    Boolean,
    Null,
    Object,
    Array,
}

impl ValueType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Null => "null",
            ValueType::Object => "object",
            ValueType::Array => "array",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_bounds_table() {
        assert_eq!((IntKind::I8.min(), IntKind::I8.max()), (-128, 127));
        assert_eq!((IntKind::U8.min(), IntKind::U8.max()), (0, 255));
        assert_eq!((IntKind::I16.min(), IntKind::I16.max()), (-32768, 32767));
        assert_eq!((IntKind::U16.min(), IntKind::U16.max()), (0, 65535));
        assert_eq!(
            (IntKind::I32.min(), IntKind::I32.max()),
            (-2147483648, 2147483647)
        );
        assert_eq!(IntKind::U32.max(), 4294967295);
        assert_eq!(IntKind::U64.max(), u64::MAX as i128);
        assert_eq!(IntKind::I64.min(), i64::MIN as i128);
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(IntKind::from_parts(16, false).unwrap(), IntKind::U16);
        assert_eq!(IntKind::from_parts(64, true).unwrap(), IntKind::I64);
        assert!(matches!(
            IntKind::from_parts(12, true),
            Err(Error::InvalidTypeHint(h)) if h == "i12"
        ));
    }

    #[test]
    fn test_tiers() {
        assert_eq!(StrTier::smallest_fitting(0), Some(StrTier::S2));
        assert_eq!(StrTier::smallest_fitting(3), Some(StrTier::S4));
        assert_eq!(StrTier::smallest_fitting(64), Some(StrTier::S64));
        assert_eq!(StrTier::smallest_fitting(65), Some(StrTier::S128));
        assert_eq!(StrTier::smallest_fitting(1024), Some(StrTier::S1024));
        assert_eq!(StrTier::smallest_fitting(1025), None);
        assert!(StrTier::new(100).is_err());
    }

    #[test]
    fn test_hint_parse_and_display() {
        for text in ["i8", "u64", "f32", "s2", "s1024", "b", "n"] {
            let hint: TypeHint = text.parse().unwrap();
            assert_eq!(hint.to_string(), text);
        }
        for bad in ["", "s", "s3", "s-2", "i128", "x", "s+64"] {
            assert!(bad.parse::<TypeHint>().is_err(), "{bad} should be rejected");
        }
    }
}
