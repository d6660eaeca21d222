//! Configuration options for GBLN rendering and conversion.
//!
//! This module provides:
//!
//! - [`RenderOptions`]: layout of rendered text (compact or pretty, indentation, comments)
//! - [`HintPolicy`]: whether type hints read from text survive into native values
//!
//! ## Examples
//!
//! ```rust
//! use serde_gbln::{native_to_serialized, NativeValue, RenderOptions};
//!
//! let point = NativeValue::object([("x", NativeValue::from(1)), ("y", NativeValue::from(2))]);
//!
//! let compact = native_to_serialized(&point, &RenderOptions::new()).unwrap();
//! assert_eq!(compact, "x<i8>(1)y<i8>(2)");
//!
//! let pretty = native_to_serialized(&point, &RenderOptions::pretty().with_indent(4)).unwrap();
//! assert_eq!(pretty, "x<i8>(1)\ny<i8>(2)\n");
//! ```

/// Layout options for the renderer.
///
/// # Examples
///
/// ```rust
/// use serde_gbln::RenderOptions;
///
/// // Compact, comments stripped
/// let options = RenderOptions::new();
///
/// // One member per line, 2-space indentation
/// let options = RenderOptions::pretty();
///
/// // Keep the comments of a parsed document
/// let options = RenderOptions::pretty().with_strip_comments(false);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub pretty: bool,
    pub indent: usize,
    pub strip_comments: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            pretty: false,
            indent: 2,
            strip_comments: true,
        }
    }
}

impl RenderOptions {
    /// Creates default options (compact, 2-space indent, comments stripped).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_gbln::RenderOptions;
    ///
    /// let options = RenderOptions::new();
    /// assert_eq!(options.indent, 2);
    /// assert!(!options.pretty);
    /// assert!(options.strip_comments);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pretty() -> Self {
        RenderOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the number of spaces per nesting level. Only affects pretty output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Chooses whether comments hoisted from a parsed document are dropped.
    #[must_use]
    pub fn with_strip_comments(mut self, strip: bool) -> Self {
        self.strip_comments = strip;
        self
    }
}

/// What happens to the hints of a parsed tree when it becomes native values.
///
/// ```rust
/// use serde_gbln::{parse_to_native_with, native_to_serialized, HintPolicy, RenderOptions};
///
/// let text = "id<u32>(12345)";
/// let reinferred = parse_to_native_with(text, HintPolicy::Reinfer).unwrap();
/// let preserved = parse_to_native_with(text, HintPolicy::Preserve).unwrap();
///
/// let options = RenderOptions::new();
/// assert_eq!(native_to_serialized(&reinferred, &options).unwrap(), "id<i16>(12345)");
/// assert_eq!(native_to_serialized(&preserved, &options).unwrap(), "id<u32>(12345)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HintPolicy {
    /// Hints are dropped; serializing again infers fresh ones.
    #[default]
    Reinfer,
    /// Each leaf keeps its hint as [`NativeValue::Hinted`](crate::NativeValue::Hinted).
    Preserve,
}
