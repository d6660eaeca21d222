//! # serde_gbln
//!
//! A Serde-compatible library for GBLN ("Goblin"), a compact, strongly-typed,
//! self-describing data interchange format.
//!
//! ## What is GBLN?
//!
//! Every GBLN leaf carries an explicit type hint that bounds it: `i8`..`u64`
//! integers, `f32`/`f64` floats, strings of at most 2..1024 bytes (`s2`..`s1024`),
//! booleans and null. Hints are enforced when a value is built and when it is
//! parsed, so an out-of-range value can never get into a document.
//!
//! ```text
//! user{id<u32>(12345)name<s64>(Alice Johnson)age<i8>(25)tags[<s8>(admin)]}
//! ```
//!
//! ## Key Features
//!
//! - **Typed Values**: integers kept at their declared width, bounded strings,
//!   validation at construction and at parse time
//! - **Type Inference**: untyped native values get the narrowest hint that fits
//! - **Handle-Owned Trees**: value trees live in an [`Allocator`] and are reached
//!   through checked [`Handle`]s; scoped [`Owned`] guards release them on every
//!   exit path
//! - **Serde Compatible**: works with `#[derive(Serialize, Deserialize)]` types
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_gbln::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "id<i8>(123)name<s8>(Alice)active<b>(t)");
//!
//! let back: User = from_str(&text).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ### Native Values
//!
//! [`NativeValue`] is the dynamic side of the conversion. [`parse_to_native`],
//! [`native_to_serialized`] and [`roundtrip`] move between it and GBLN text:
//!
//! ```rust
//! use serde_gbln::{gbln, native_to_serialized, parse_to_native, RenderOptions};
//!
//! let value = parse_to_native("user{id<u32>(12345)name<s64>(Alice Johnson)age<i8>(25)}").unwrap();
//! assert_eq!(
//!     value,
//!     gbln!({ "user": { "id": 12345, "name": "Alice Johnson", "age": 25 } })
//! );
//!
//! // hints are re-inferred on the way back out
//! let text = native_to_serialized(&value, &RenderOptions::new()).unwrap();
//! assert_eq!(text, "user{id<i16>(12345)name<s16>(Alice Johnson)age<i8>(25)}");
//! ```
//!
//! ### Value Trees
//!
//! For direct control, build and inspect trees in an [`Allocator`]; see the
//! [`arena`] module.
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: `trace` for
//! node allocation, `debug` for conversion boundaries and scope-exit releases,
//! `error` for ownership violations. It installs no logger of its own.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - serialize and parse a struct
//! - **`macro.rs`** - building native values with `gbln!`
//! - **`dynamic_values.rs`** - native values, hints and inference
//! - **`custom_options.rs`** - pretty output, indentation and comments
//! - **`handles.rs`** - building trees by hand in an allocator
//!
//! Run any example with: `cargo run --example <name>`

pub mod arena;
pub mod convert;
pub mod de;
pub mod error;
pub mod grammar;
pub mod hint;
pub mod infer;
pub mod macros;
pub mod map;
pub mod native;
pub mod options;
pub mod ser;
pub mod value;

pub use arena::{Allocator, AllocatorStats, Handle, Owned};
pub use convert::Converter;
pub use de::{parse, Document, NativeDeserializer, Parser};
pub use error::{Error, ErrorCode, OwnershipError, ParseError, Result};
pub use hint::{FloatKind, IntKind, StrTier, TypeHint, ValueType};
pub use infer::{infer, InferenceStrategy, Narrowest, Widest};
pub use map::GoblinMap;
pub use native::{NativeArray, NativeMap, NativeObject, NativeValue, Number};
pub use options::{HintPolicy, RenderOptions};
pub use ser::{NativeSerializer, Renderer};
pub use value::{BoundedStr, Float, GoblinValue, Integer};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Parse GBLN text into a native value, re-inferring hints on the way out.
///
/// # Examples
///
/// ```rust
/// use serde_gbln::{parse_to_native, NativeValue};
///
/// let value = parse_to_native("ok<b>(t)").unwrap();
/// assert_eq!(value.get("ok"), Some(NativeValue::Bool(true)));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed text and for values that do not fit
/// their hints. Error messages include line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_to_native(text: &str) -> Result<NativeValue> {
    parse_to_native_with(text, HintPolicy::default())
}

/// Parse GBLN text into a native value under an explicit [`HintPolicy`].
///
/// # Errors
///
/// As [`parse_to_native`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_to_native_with(text: &str, policy: HintPolicy) -> Result<NativeValue> {
    let alloc = Allocator::new();
    let document = parse(&alloc, text)?;
    Converter::new(&alloc)
        .with_policy(policy)
        .tree_to_native(document.into_root())
}

/// Serialize a native value to GBLN text, inferring hints where none are given.
///
/// # Examples
///
/// ```rust
/// use serde_gbln::{native_to_serialized, NativeValue, RenderOptions};
///
/// let tags = NativeValue::array([NativeValue::from("rust"), NativeValue::from(true)]);
/// let text = native_to_serialized(&tags, &RenderOptions::new()).unwrap();
/// assert_eq!(text, "[<s4>(rust)<b>(t)]");
/// ```
///
/// # Errors
///
/// - validation errors for values that do not fit an explicit hint, or
///   strings longer than 1024 bytes; below the root these come wrapped in
///   [`Error::At`] with the path of the value
/// - [`Error::Serialize`] for circular references, opaque values, nesting
///   deeper than 128 levels and keys that are not valid GBLN keys
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn native_to_serialized(value: &NativeValue, options: &RenderOptions) -> Result<String> {
    let alloc = Allocator::new();
    let root = Converter::new(&alloc).native_to_tree(value)?;
    let text = Renderer::new(&alloc, options.clone()).render(root.handle(), &[]);
    root.release()?;
    text
}

/// Parse GBLN text and render it again, compact with comments stripped.
///
/// Hints are kept exactly as written.
///
/// ```rust
/// use serde_gbln::roundtrip;
///
/// let text = "user {\n  id<u32>(12345)\n  name<s64>(Alice Johnson)\n}\n";
/// assert_eq!(roundtrip(text).unwrap(), "user{id<u32>(12345)name<s64>(Alice Johnson)}");
/// ```
///
/// # Errors
///
/// As [`parse_to_native`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn roundtrip(text: &str) -> Result<String> {
    reformat(text, &RenderOptions::new())
}

/// Parse GBLN text and render it again with `options`.
///
/// Unlike [`roundtrip`], comments survive when `options.strip_comments` is off.
///
/// # Errors
///
/// As [`parse_to_native`], plus [`Error::Serialize`] for unrenderable keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn reformat(text: &str, options: &RenderOptions) -> Result<String> {
    let alloc = Allocator::new();
    let document = parse(&alloc, text)?;
    let output = Renderer::new(&alloc, options.clone())
        .render(document.root().handle(), document.comments());
    document.into_root().release()?;
    output
}

/// Convert any `T: Serialize` to a [`NativeValue`].
///
/// # Examples
///
/// ```rust
/// use serde_gbln::{to_native, NativeValue};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_native(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.get("y"), Some(NativeValue::from(2)));
/// ```
///
/// # Errors
///
/// Returns an error for map keys that are not strings, numbers or booleans,
/// and for 128-bit integers beyond 64 bits.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_native<T>(value: &T) -> Result<NativeValue>
where
    T: ?Sized + Serialize,
{
    ser::to_native_value(value)
}

/// Deserialize an instance of type `T` from a [`NativeValue`].
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_native<T>(value: NativeValue) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(NativeDeserializer::new(value))
}

/// Serialize any `T: Serialize` to a compact GBLN string.
///
/// # Errors
///
/// As [`to_native`] and [`native_to_serialized`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &RenderOptions::default())
}

/// Serialize any `T: Serialize` to a pretty-printed GBLN string.
///
/// # Examples
///
/// ```rust
/// use serde_gbln::to_string_pretty;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string_pretty(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(text, "x<i8>(1)\ny<i8>(2)\n");
/// ```
///
/// # Errors
///
/// As [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &RenderOptions::pretty())
}

/// Serialize any `T: Serialize` to a GBLN string with custom options.
///
/// # Errors
///
/// As [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &RenderOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    native_to_serialized(&to_native(value)?, options)
}

/// Serialize any `T: Serialize` to a writer in compact GBLN.
///
/// # Examples
///
/// ```rust
/// use serde_gbln::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![1, 2, 3]).unwrap();
/// assert_eq!(buffer, b"[<i8>(1)<i8>(2)<i8>(3)]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &RenderOptions::default())
}

/// Serialize any `T: Serialize` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &RenderOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from GBLN text.
///
/// # Examples
///
/// ```rust
/// use serde_gbln::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x<i8>(1)\ny<u32>(2)").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid GBLN or cannot be deserialized
/// to type `T`. Parse errors include line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_native(parse_to_native(s)?)
}

/// Deserialize an instance of type `T` from an I/O stream of GBLN.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid GBLN, or the
/// data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of GBLN text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid GBLN, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}
