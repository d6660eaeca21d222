//! GBLN deserialization.
//!
//! This module provides two deserializers:
//!
//! - [`Parser`]: reads GBLN text into a typed tree owned by an [`Allocator`]
//! - [`NativeDeserializer`]: drives serde `Deserialize` impls from a [`NativeValue`]
//!
//! ## Overview
//!
//! The parser is single-pass with no backtracking. Every leaf is validated
//! against its type hint as it is read, so a document that parses is a
//! document whose values all fit:
//!
//! ```rust
//! use serde_gbln::{parse_to_native, ErrorCode};
//!
//! let value = parse_to_native("user{id<u32>(12345)name<s64>(Alice Johnson)}").unwrap();
//! assert_eq!(value.get("user").and_then(|u| u.get("name")).unwrap().as_str(), Some("Alice Johnson"));
//!
//! let err = parse_to_native("tag<s4>(toolong)").unwrap_err();
//! assert_eq!(err.code(), Some(ErrorCode::StringTooLong));
//! ```
//!
//! Errors carry the line and column of the token that caused them. Nodes
//! built before a failure are released before the error is returned.

use crate::arena::{Allocator, Owned};
use crate::hint::TypeHint;
use crate::native::{NativeMap, NativeValue, Number};
use crate::{Error, ErrorCode, Result};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};
use std::rc::Rc;

/// Nesting deeper than this is rejected instead of risking the stack.
pub(crate) const MAX_DEPTH: usize = 128;

/// Returns `true` for characters allowed in object keys.
#[inline]
pub(crate) fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-')
}

/// A parsed document: its root node plus the comments hoisted out of it.
#[derive(Debug)]
pub struct Document<'a> {
    root: Owned<'a>,
    comments: Vec<String>,
}

impl<'a> Document<'a> {
    #[must_use]
    pub fn root(&self) -> &Owned<'a> {
        &self.root
    }

    /// Comment texts in document order, without the `:|` marker.
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    #[must_use]
    pub fn into_root(self) -> Owned<'a> {
        self.root
    }
}

/// The GBLN text parser.
///
/// Created via [`Parser::new`]; [`Parser::parse`] consumes it.
pub struct Parser<'de, 'a> {
    input: &'de str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    alloc: &'a Allocator,
    comments: Vec<String>,
}

impl<'de, 'a> Parser<'de, 'a> {
    pub fn new(alloc: &'a Allocator, input: &'de str) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            alloc,
            comments: Vec::new(),
        }
    }

    /// Parses the whole input.
    ///
    /// A document is either a single value or a sequence of members, which
    /// form the root object. Empty input is an empty object.
    pub fn parse(mut self) -> Result<Document<'a>> {
        self.skip_whitespace();
        let root = match self.peek_char() {
            None => self.alloc.new_object(),
            Some('<' | '{' | '[') => {
                let value = self.parse_value()?;
                self.skip_whitespace();
                if let Some(ch) = self.peek_char() {
                    return Err(self.error(
                        ErrorCode::UnexpectedToken,
                        &format!("unexpected `{}` after the root value", ch),
                    ));
                }
                value
            }
            Some(_) => {
                let root = self.alloc.new_object();
                self.parse_members(&root, None)?;
                root
            }
        };
        log::debug!(
            "parsed {} bytes, {} comments",
            self.input.len(),
            self.comments.len()
        );
        Ok(Document {
            root,
            comments: self.comments,
        })
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error(&self, code: ErrorCode, message: &str) -> Error {
        Error::parse(code, self.line, self.column, message)
    }

    /// Re-raises a validation failure as a parse error at `(line, column)`.
    fn invalid(&self, err: Error, line: usize, column: usize) -> Error {
        match err.code() {
            Some(code) if err.is_validation() => {
                Error::parse(code, line, column, &err.to_string())
            }
            _ => err,
        }
    }

    /// Skips whitespace and `:|` comments, collecting the comments.
    fn skip_whitespace(&mut self) {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.next_char();
                }
                Some(':') if self.input[self.position..].starts_with(":|") => {
                    self.next_char();
                    self.next_char();
                    let start = self.position;
                    while let Some(ch) = self.peek_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.next_char();
                    }
                    self.comments
                        .push(self.input[start..self.position].trim().to_string());
                }
                _ => break,
            }
        }
    }

    fn parse_key(&mut self) -> String {
        let start = self.position;
        while matches!(self.peek_char(), Some(ch) if is_key_char(ch)) {
            self.next_char();
        }
        self.input[start..self.position].to_string()
    }

    fn parse_members(&mut self, object: &Owned<'a>, close: Option<char>) -> Result<()> {
        loop {
            self.skip_whitespace();
            match self.peek_char() {
                None => {
                    return match close {
                        Some(close) => Err(self.error(
                            ErrorCode::UnexpectedEof,
                            &format!("expected `{}` to close the object", close),
                        )),
                        None => Ok(()),
                    };
                }
                Some(ch) if Some(ch) == close => {
                    self.next_char();
                    return Ok(());
                }
                Some(ch) if is_key_char(ch) => {
                    let (line, column) = (self.line, self.column);
                    let key = self.parse_key();
                    self.skip_whitespace();
                    let value = self.parse_value()?;
                    object
                        .insert(key, value)
                        .map_err(|err| self.invalid(err, line, column))?;
                }
                Some(ch) => {
                    return Err(self.error(
                        ErrorCode::UnexpectedChar,
                        &format!("unexpected `{}`, expected a key", ch),
                    ))
                }
            }
        }
    }

    fn parse_value(&mut self) -> Result<Owned<'a>> {
        self.skip_whitespace();
        let (line, column) = (self.line, self.column);
        match self.next_char() {
            Some('<') => self.parse_leaf(line, column),
            Some('{') => {
                self.descend()?;
                let object = self.alloc.new_object();
                self.parse_members(&object, Some('}'))?;
                self.depth -= 1;
                Ok(object)
            }
            Some('[') => {
                self.descend()?;
                let array = self.alloc.new_array();
                loop {
                    self.skip_whitespace();
                    match self.peek_char() {
                        None => {
                            return Err(self.error(
                                ErrorCode::UnexpectedEof,
                                "expected `]` to close the array",
                            ))
                        }
                        Some(']') => {
                            self.next_char();
                            break;
                        }
                        Some(_) => array.push(self.parse_value()?)?,
                    }
                }
                self.depth -= 1;
                Ok(array)
            }
            Some(ch) => Err(Error::parse(
                ErrorCode::UnexpectedChar,
                line,
                column,
                &format!("unexpected `{}`, expected `<`, `{{` or `[`", ch),
            )),
            None => Err(self.error(ErrorCode::UnexpectedEof, "expected a value")),
        }
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(
                ErrorCode::InvalidSyntax,
                &format!("nesting deeper than {} levels", MAX_DEPTH),
            ));
        }
        Ok(())
    }

    /// Parses `hint>(raw)`, the opening `<` already consumed.
    fn parse_leaf(&mut self, line: usize, column: usize) -> Result<Owned<'a>> {
        let start = self.position;
        loop {
            match self.next_char() {
                Some('>') => break,
                Some(ch) if ch.is_ascii_alphanumeric() => {}
                Some(ch) => {
                    return Err(self.error(
                        ErrorCode::UnexpectedChar,
                        &format!("unexpected `{}` in type hint", ch),
                    ))
                }
                None => return Err(self.error(ErrorCode::UnexpectedEof, "expected `>`")),
            }
        }
        let hint_text = &self.input[start..self.position - 1];
        let hint: TypeHint = hint_text
            .parse()
            .map_err(|err| self.invalid(err, line, column))?;

        match self.next_char() {
            Some('(') => {}
            Some(ch) => {
                return Err(self.error(
                    ErrorCode::UnexpectedChar,
                    &format!("unexpected `{}`, expected `(`", ch),
                ))
            }
            None => return Err(self.error(ErrorCode::UnexpectedEof, "expected `(`")),
        }
        let raw = self.parse_raw()?;
        self.build_leaf(hint, &raw)
            .map_err(|err| self.invalid(err, line, column))
    }

    /// Reads the raw text of a leaf up to the closing `)`, resolving escapes.
    fn parse_raw(&mut self) -> Result<String> {
        let mut raw = String::new();
        loop {
            match self.next_char() {
                Some(')') => return Ok(raw),
                Some('\\') => match self.next_char() {
                    Some(ch @ ('\\' | '(' | ')')) => raw.push(ch),
                    Some(ch) => {
                        return Err(self.error(
                            ErrorCode::InvalidSyntax,
                            &format!("unknown escape `\\{}`", ch),
                        ))
                    }
                    None => {
                        return Err(self.error(
                            ErrorCode::UnterminatedString,
                            "input ends inside an escape",
                        ))
                    }
                },
                Some(ch) => raw.push(ch),
                None => {
                    return Err(self.error(
                        ErrorCode::UnterminatedString,
                        "missing `)` to close the value",
                    ))
                }
            }
        }
    }

    fn build_leaf(&self, hint: TypeHint, raw: &str) -> Result<Owned<'a>> {
        let syntax = |what: &str| {
            self.error(
                ErrorCode::InvalidSyntax,
                &format!("invalid {} `{}`", what, raw),
            )
        };
        match hint {
            TypeHint::Int(kind) => {
                let value = raw.trim().parse::<i128>().map_err(|_| syntax("integer"))?;
                self.alloc.new_integer(kind, value)
            }
            TypeHint::Float(kind) => {
                let value = raw.trim().parse::<f64>().map_err(|_| syntax("float"))?;
                Ok(self.alloc.new_float(kind, value))
            }
            TypeHint::Str(tier) => self.alloc.new_string(raw, Some(tier)),
            TypeHint::Bool => match raw.trim() {
                "t" | "true" => Ok(self.alloc.new_bool(true)),
                "f" | "false" => Ok(self.alloc.new_bool(false)),
                _ => Err(self.error(
                    ErrorCode::TypeMismatch,
                    &format!("expected boolean, found `{}`", raw),
                )),
            },
            TypeHint::Null if raw.trim().is_empty() => Ok(self.alloc.new_null()),
            TypeHint::Null => Err(self.error(
                ErrorCode::TypeMismatch,
                &format!("null takes no value, found `{}`", raw),
            )),
        }
    }
}

/// Parses `input` into a tree owned by `alloc`.
pub fn parse<'a>(alloc: &'a Allocator, input: &str) -> Result<Document<'a>> {
    Parser::new(alloc, input).parse()
}

fn take_vec(items: Rc<std::cell::RefCell<Vec<NativeValue>>>) -> Vec<NativeValue> {
    Rc::try_unwrap(items)
        .map(|cell| cell.into_inner())
        .unwrap_or_else(|shared| shared.borrow().clone())
}

fn take_map(members: Rc<std::cell::RefCell<NativeMap>>) -> NativeMap {
    Rc::try_unwrap(members)
        .map(|cell| cell.into_inner())
        .unwrap_or_else(|shared| shared.borrow().clone())
}

/// Deserializes Rust values out of a [`NativeValue`].
///
/// Explicit hints are looked through, so values parsed under
/// [`HintPolicy::Preserve`](crate::HintPolicy::Preserve) deserialize as usual.
pub struct NativeDeserializer {
    value: NativeValue,
}

impl NativeDeserializer {
    #[must_use]
    pub fn new(value: NativeValue) -> Self {
        let mut value = value;
        while let NativeValue::Hinted(_, inner) = value {
            value = *inner;
        }
        NativeDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for NativeDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            NativeValue::Undefined | NativeValue::Null => visitor.visit_unit(),
            NativeValue::Bool(b) => visitor.visit_bool(b),
            NativeValue::Number(Number::Int(i)) => visitor.visit_i64(i),
            NativeValue::Number(Number::UInt(u)) => visitor.visit_u64(u),
            NativeValue::Number(Number::Float(f)) => visitor.visit_f64(f),
            NativeValue::String(s) => visitor.visit_string(s),
            NativeValue::Array(items) => visitor.visit_seq(SeqDeserializer::new(take_vec(items))),
            NativeValue::Object(members) => {
                visitor.visit_map(MapDeserializer::new(take_map(members)))
            }
            NativeValue::Hinted(_, inner) => NativeDeserializer::new(*inner).deserialize_any(visitor),
            NativeValue::Opaque(kind) => Err(Error::custom(format!(
                "cannot deserialize native value of type {}",
                kind
            ))),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.value.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            NativeValue::String(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            NativeValue::Object(members) => {
                let mut members = take_map(members).into_iter();
                match (members.next(), members.next()) {
                    (Some((variant, value)), None) => visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: Some(value),
                    }),
                    _ => Err(Error::custom("expected an object with a single variant key")),
                }
            }
            other => Err(Error::custom(format!(
                "expected enum variant, found {}",
                other.type_name()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, Error> for NativeValue {
    type Deserializer = NativeDeserializer;

    fn into_deserializer(self) -> NativeDeserializer {
        NativeDeserializer::new(self)
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<NativeValue>,
}

impl SeqDeserializer {
    fn new(vec: Vec<NativeValue>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(NativeDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, NativeValue>,
    value: Option<NativeValue>,
}

impl MapDeserializer {
    fn new(map: NativeMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(NativeDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<NativeValue>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant =
            seed.deserialize(IntoDeserializer::<'de, Error>::into_deserializer(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<NativeValue>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(value) if value.is_null() => Ok(()),
            Some(_) => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(NativeDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.map(NativeDeserializer::new) {
            Some(inner) => match inner.value {
                NativeValue::Array(items) => visitor.visit_seq(SeqDeserializer::new(take_vec(items))),
                _ => Err(Error::custom("expected tuple variant")),
            },
            None => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.map(NativeDeserializer::new) {
            Some(inner) => match inner.value {
                NativeValue::Object(members) => {
                    visitor.visit_map(MapDeserializer::new(take_map(members)))
                }
                _ => Err(Error::custom("expected struct variant")),
            },
            None => Err(Error::custom("expected struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hint::{IntKind, StrTier, ValueType};
    use serde::Deserialize;

    fn parse_err(input: &str) -> crate::ParseError {
        let alloc = Allocator::new();
        let err = parse(&alloc, input).unwrap_err();
        assert_eq!(alloc.stats().live, 0, "leak after `{input}`");
        match err {
            Error::Parse(e) => e,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_nested_document() {
        let alloc = Allocator::new();
        let doc = parse(
            &alloc,
            "user{id<u32>(12345)name<s64>(Alice Johnson)tags[<s8>(a)<s8>(b)]}",
        )
        .unwrap();
        let root = doc.root().handle();
        let user = alloc.object_get(root, "user").unwrap();
        assert_eq!(
            alloc.object_keys(user).unwrap(),
            vec!["id", "name", "tags"]
        );
        let id = alloc.as_integer(alloc.object_get(user, "id").unwrap()).unwrap();
        assert_eq!((id.kind(), id.value()), (IntKind::U32, 12345));
        let name = alloc.as_str(alloc.object_get(user, "name").unwrap()).unwrap();
        assert_eq!(name.tier(), StrTier::S64);
        let tags = alloc.object_get(user, "tags").unwrap();
        assert_eq!(alloc.array_len(tags).unwrap(), 2);
        drop(doc);
        assert_eq!(alloc.stats().live, 0);
    }

    #[test]
    fn test_empty_document_is_empty_object() {
        let alloc = Allocator::new();
        let doc = parse(&alloc, "  \n:| nothing here\n").unwrap();
        assert_eq!(alloc.type_of(doc.root().handle()).unwrap(), ValueType::Object);
        assert_eq!(doc.comments(), ["nothing here"]);
    }

    #[test]
    fn test_whitespace_and_comments_between_tokens() {
        let alloc = Allocator::new();
        let doc = parse(
            &alloc,
            ":| header\nconfig {\n  port<u16>( 8080 ) :| default\n  debug<b>(t)\n}\n",
        )
        .unwrap();
        let config = alloc.object_get(doc.root().handle(), "config").unwrap();
        let port = alloc.object_get(config, "port").unwrap();
        assert_eq!(alloc.as_integer(port).unwrap().value(), 8080);
        let debug = alloc.object_get(config, "debug").unwrap();
        assert!(alloc.as_bool(debug).unwrap());
        assert_eq!(doc.comments(), ["header", "default"]);
    }

    #[test]
    fn test_root_value_forms() {
        let alloc = Allocator::new();
        let doc = parse(&alloc, "[<i8>(1) <n>() <f32>(0.5)]").unwrap();
        assert_eq!(alloc.array_len(doc.root().handle()).unwrap(), 3);
        let doc = parse(&alloc, "<b>(false)").unwrap();
        assert!(!alloc.as_bool(doc.root().handle()).unwrap());
    }

    #[test]
    fn test_string_escapes() {
        let alloc = Allocator::new();
        let doc = parse(&alloc, r"note<s32>(a \(b\) c\\d)").unwrap();
        let note = alloc.object_get(doc.root().handle(), "note").unwrap();
        assert_eq!(alloc.as_str(note).unwrap().as_str(), r"a (b) c\d");
    }

    #[test]
    fn test_out_of_range_reports_bounds_and_position() {
        let err = parse_err("name<s8>(Bob)\nage<i8>(999)");
        assert_eq!(err.code, ErrorCode::IntOutOfRange);
        assert_eq!((err.line, err.column), (2, 4));
        assert!(err.message.contains("[-128, 127]"), "{}", err.message);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(parse_err("a<s4>(hello)").code, ErrorCode::StringTooLong);
        assert_eq!(parse_err("a<i8>(1)a<i8>(2)").code, ErrorCode::DuplicateKey);
        assert_eq!(parse_err("a<i12>(1)").code, ErrorCode::InvalidTypeHint);
        assert_eq!(parse_err("a<s8>(open").code, ErrorCode::UnterminatedString);
        assert_eq!(parse_err("a{b<i8>(1)").code, ErrorCode::UnexpectedEof);
        assert_eq!(parse_err("a<i8>(x1)").code, ErrorCode::InvalidSyntax);
        assert_eq!(parse_err("a<b>(yes)").code, ErrorCode::TypeMismatch);
        assert_eq!(parse_err("a<n>(0)").code, ErrorCode::TypeMismatch);
        assert_eq!(parse_err("a(1)").code, ErrorCode::UnexpectedChar);
        assert_eq!(parse_err("<i8>(1)<i8>(2)").code, ErrorCode::UnexpectedToken);
        assert_eq!(parse_err("a<s8>(x\\y)").code, ErrorCode::InvalidSyntax);
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert_eq!(parse_err(&deep).code, ErrorCode::InvalidSyntax);
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect { w: u8, h: u8 },
    }

    #[test]
    fn test_native_deserializer_enums_and_options() {
        let shapes = NativeValue::array([
            NativeValue::from("Empty"),
            NativeValue::object([("Circle", NativeValue::from(1.5))]),
            NativeValue::object([(
                "Rect",
                NativeValue::object([("w", NativeValue::from(2)), ("h", NativeValue::from(3))]),
            )]),
        ]);
        let shapes = Vec::<Shape>::deserialize(NativeDeserializer::new(shapes)).unwrap();
        assert_eq!(
            shapes,
            vec![Shape::Empty, Shape::Circle(1.5), Shape::Rect { w: 2, h: 3 }]
        );

        let some = Option::<u32>::deserialize(NativeDeserializer::new(NativeValue::from(7))).unwrap();
        assert_eq!(some, Some(7));
        let none = Option::<u32>::deserialize(NativeDeserializer::new(NativeValue::Undefined)).unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn test_native_deserializer_sees_through_hints() {
        let value = NativeValue::hinted(TypeHint::Int(IntKind::U32), NativeValue::from(12345));
        assert_eq!(u32::deserialize(NativeDeserializer::new(value)).unwrap(), 12345);
    }
}
