//! GBLN Format Reference
//!
//! This module documents the GBLN ("Goblin") text format as implemented by
//! this library.
//!
//! # Overview
//!
//! GBLN is a compact, strongly-typed, self-describing interchange format for
//! configuration, API payloads and AI context windows. Every leaf states its
//! type and bound, so a reader never has to guess whether `25` is a byte or
//! a 64-bit counter.
//!
//! ```text
//! user{id<u32>(12345)name<s64>(Alice Johnson)age<i8>(25)}
//! ```
//!
//! # Grammar
//!
//! ```text
//! document := ws ( value | member* ) ws EOF
//! member   := key ws value
//! key      := [A-Za-z0-9_.-]+
//! value    := '<' hint '>' '(' raw ')'      typed leaf
//!           | '{' member* '}'                object
//!           | '[' value* ']'                 array
//! hint     := i8|i16|i32|i64|u8|u16|u32|u64|f32|f64|s<tier>|b|n
//! ws       := whitespace | ':|' comment-to-end-of-line
//! ```
//!
//! Whitespace is free between tokens and never significant. A document that
//! does not start with `<`, `{` or `[` is a list of members forming the root
//! object; an empty document is an empty object.
//!
//! # Type Hints
//!
//! | Hint | Meaning | Range |
//! |------|---------|-------|
//! | `i8` `i16` `i32` `i64` | signed integer | two's complement bounds of the width |
//! | `u8` `u16` `u32` `u64` | unsigned integer | `0` to `2^width - 1` |
//! | `f32` `f64` | IEEE 754 float | `NaN`, `inf` and `-inf` allowed |
//! | `s2` .. `s1024` | UTF-8 string | at most the tier in **bytes** |
//! | `b` | boolean | `t` / `f` (`true` / `false` accepted on input) |
//! | `n` | null | raw text must be empty |
//!
//! String tiers are the powers of two from 2 to 1024. Any other tier, such
//! as `s3` or `s2048`, is an invalid hint.
//!
//! Integers are stored at their declared width and never widened or
//! clamped: `age<i8>(999)` is an error, not `127`.
//!
//! # Leaf Text
//!
//! Raw text runs to the first unescaped `)`. Integer and float text is
//! trimmed before parsing; string text is kept verbatim, so
//! `name<s16>( padded )` holds two spaces. Inside raw text:
//!
//! | Escape | Character |
//! |--------|-----------|
//! | `\\` | `\` |
//! | `\(` | `(` |
//! | `\)` | `)` |
//!
//! # Comments
//!
//! `:|` starts a comment that runs to the end of the line. Comments are
//! collected from anywhere in the document and hoisted: when rendering with
//! `strip_comments` off they are written first, one `:|` line each.
//!
//! ```text
//! :| service settings
//! server{
//!   host<s16>(localhost)
//!   port<u16>(8080)   :| default port
//! }
//! ```
//!
//! # Rendering
//!
//! - **Compact** (default): no whitespace at all, root object members bare
//! - **Pretty**: one member or element per line, `indent` spaces per level,
//!   each line newline-terminated; empty containers stay `{}` and `[]`
//! - Floats use the shortest text that reads back to the same value at
//!   their width
//!
//! # Type Inference
//!
//! Values converted from untyped native data get the narrowest hint that
//! holds them:
//!
//! - integers: the first of `i8 u8 i16 u16 i32 u32 i64 u64` whose range
//!   contains the value (negative values only consider signed widths)
//! - non-integral numbers: `f64`
//! - strings: the smallest tier at least as large as the byte length
//! - booleans `b`, null and undefined `n`
//!
//! Floats that are integral and within `2^53 - 1` count as integers, so
//! `2.0` becomes `<i8>(2)`.
//!
//! # Limits
//!
//! - Nesting deeper than 128 levels is rejected when parsing and when
//!   writing; a root object's members do not count as a level
//! - Object keys are unique; a repeated key is an error
//! - Strings longer than 1024 bytes cannot be represented
//!
//! # Rust-Specific Serialization
//!
//! Through serde:
//!
//! - **Structs and maps**: objects in field order
//! - **Sequences and tuples**: arrays
//! - **Unit variants**: strings: `status<s8>(Active)`
//! - **Other variants**: a single-member object keyed by the variant name
//! - **`None` and `()`**: `<n>()`

// This module contains only documentation; no implementation code
