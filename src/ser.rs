//! GBLN serialization.
//!
//! This module provides:
//!
//! - [`Renderer`]: writes a typed tree as GBLN text
//! - [`NativeSerializer`]: turns any `Serialize` type into a [`NativeValue`]
//!
//! ## Overview
//!
//! Compact output has no whitespace at all. Pretty output puts each member
//! or element on its own line and indents nested levels:
//!
//! ```rust
//! use serde_gbln::{native_to_serialized, NativeValue, RenderOptions};
//!
//! let user = NativeValue::object([(
//!     "user",
//!     NativeValue::object([
//!         ("id", NativeValue::from(7)),
//!         ("tags", NativeValue::array([NativeValue::from("a")])),
//!     ]),
//! )]);
//!
//! let compact = native_to_serialized(&user, &RenderOptions::new()).unwrap();
//! assert_eq!(compact, "user{id<i8>(7)tags[<s2>(a)]}");
//!
//! let pretty = native_to_serialized(&user, &RenderOptions::pretty()).unwrap();
//! assert_eq!(pretty, "user{\n  id<i8>(7)\n  tags[\n    <s2>(a)\n  ]\n}\n");
//! ```
//!
//! A root object is written as its bare members, which is also how the
//! parser reads a document that does not start with a value.

use crate::arena::{Allocator, Handle};
use crate::de::{is_key_char, MAX_DEPTH};
use crate::native::{NativeMap, NativeValue, Number};
use crate::options::RenderOptions;
use crate::value::GoblinValue;
use crate::{Error, Result};
use serde::{ser, Serialize};
use std::fmt::Write;

/// Writes trees from one allocator as GBLN text.
pub struct Renderer<'a> {
    alloc: &'a Allocator,
    options: RenderOptions,
    output: String,
}

enum Node {
    Leaf(String),
    Object(Vec<(String, Handle)>),
    Array(Vec<Handle>),
}

impl<'a> Renderer<'a> {
    pub fn new(alloc: &'a Allocator, options: RenderOptions) -> Self {
        // 256 bytes covers most small documents without reallocating
        Renderer {
            alloc,
            options,
            output: String::with_capacity(256),
        }
    }

    /// Renders the tree under `root`, preceded by `comments` unless the
    /// options strip them.
    pub fn render(mut self, root: Handle, comments: &[String]) -> Result<String> {
        if !self.options.strip_comments {
            for comment in comments {
                self.output.push_str(":| ");
                self.output.push_str(comment);
                self.output.push('\n');
            }
        }
        match self.read(root)? {
            Node::Object(members) => {
                for (key, child) in members {
                    self.write_member(&key, child, 0)?;
                }
            }
            node => {
                self.write_node(node, 0)?;
                self.end_line();
            }
        }
        Ok(self.output)
    }

    fn read(&self, handle: Handle) -> Result<Node> {
        self.alloc.with_value(handle, |value| match value {
            GoblinValue::Object(map) => Node::Object(
                map.iter()
                    .map(|(key, child)| (key.clone(), *child))
                    .collect(),
            ),
            GoblinValue::Array(items) => Node::Array(items.clone()),
            leaf => Node::Leaf(leaf_text(leaf)),
        })
    }

    fn write_indent(&mut self, depth: usize) {
        if self.options.pretty {
            for _ in 0..depth * self.options.indent {
                self.output.push(' ');
            }
        }
    }

    fn end_line(&mut self) {
        if self.options.pretty {
            self.output.push('\n');
        }
    }

    fn write_member(&mut self, key: &str, child: Handle, depth: usize) -> Result<()> {
        if key.is_empty() || !key.chars().all(is_key_char) {
            return Err(Error::serialize(format_args!(
                "key `{}` is not a valid GBLN key",
                key
            )));
        }
        self.write_indent(depth);
        self.output.push_str(key);
        let node = self.read(child)?;
        self.write_node(node, depth)?;
        self.end_line();
        Ok(())
    }

    /// Writes a value whose first line is already indented.
    fn write_node(&mut self, node: Node, depth: usize) -> Result<()> {
        // a container at `depth` opens bracket level `depth + 1`
        if depth >= MAX_DEPTH && !matches!(node, Node::Leaf(_)) {
            return Err(Error::serialize(format_args!(
                "nesting deeper than {} levels",
                MAX_DEPTH
            )));
        }
        match node {
            Node::Leaf(text) => self.output.push_str(&text),
            Node::Object(members) => {
                self.output.push('{');
                if !members.is_empty() {
                    self.end_line();
                    for (key, child) in members {
                        self.write_member(&key, child, depth + 1)?;
                    }
                    self.write_indent(depth);
                }
                self.output.push('}');
            }
            Node::Array(items) => {
                self.output.push('[');
                if !items.is_empty() {
                    self.end_line();
                    for child in items {
                        self.write_indent(depth + 1);
                        let node = self.read(child)?;
                        self.write_node(node, depth + 1)?;
                        self.end_line();
                    }
                    self.write_indent(depth);
                }
                self.output.push(']');
            }
        }
        Ok(())
    }
}

/// `<hint>(raw)` for a leaf.
fn leaf_text(value: &GoblinValue) -> String {
    let mut out = String::new();
    if let Some(hint) = value.hint() {
        let _ = write!(out, "<{}>(", hint);
    }
    match value {
        GoblinValue::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        GoblinValue::Float(f) => {
            let _ = write!(out, "{}", f);
        }
        GoblinValue::Str(s) => {
            for ch in s.as_str().chars() {
                if matches!(ch, '\\' | '(' | ')') {
                    out.push('\\');
                }
                out.push(ch);
            }
        }
        GoblinValue::Bool(b) => out.push(if *b { 't' } else { 'f' }),
        GoblinValue::Null | GoblinValue::Object(_) | GoblinValue::Array(_) => {}
    }
    out.push(')');
    out
}

/// Serializes Rust values into [`NativeValue`]s.
///
/// Structs and maps become objects in field order, sequences and tuples
/// become arrays, and enums are externally tagged (`{"Variant": value}`,
/// or the bare variant name for unit variants).
pub struct NativeSerializer;

pub struct SerializeVec {
    vec: Vec<NativeValue>,
}

pub struct SerializeMap {
    map: NativeMap,
    current_key: Option<String>,
}

pub struct SerializeVariant<T> {
    variant: &'static str,
    inner: T,
}

impl ser::Serializer for NativeSerializer {
    type Ok = NativeValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVariant<SerializeVec>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeVariant<SerializeMap>;

    fn serialize_bool(self, v: bool) -> Result<NativeValue> {
        Ok(NativeValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<NativeValue> {
        Ok(NativeValue::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<NativeValue> {
        Ok(NativeValue::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<NativeValue> {
        Ok(NativeValue::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<NativeValue> {
        Ok(NativeValue::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<NativeValue> {
        if i64::try_from(v).is_ok() || u64::try_from(v).is_ok() {
            Ok(NativeValue::Number(Number::from_i128(v)))
        } else {
            Err(Error::serialize(format_args!("{} does not fit in 64 bits", v)))
        }
    }

    fn serialize_u8(self, v: u8) -> Result<NativeValue> {
        Ok(NativeValue::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<NativeValue> {
        Ok(NativeValue::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<NativeValue> {
        Ok(NativeValue::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<NativeValue> {
        Ok(NativeValue::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<NativeValue> {
        match u64::try_from(v) {
            Ok(v) => Ok(NativeValue::from(v)),
            Err(_) => Err(Error::serialize(format_args!("{} does not fit in 64 bits", v))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<NativeValue> {
        Ok(NativeValue::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<NativeValue> {
        Ok(NativeValue::from(v))
    }

    fn serialize_char(self, v: char) -> Result<NativeValue> {
        Ok(NativeValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<NativeValue> {
        Ok(NativeValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<NativeValue> {
        Ok(NativeValue::array(v.iter().map(|&b| NativeValue::from(b))))
    }

    fn serialize_none(self) -> Result<NativeValue> {
        Ok(NativeValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<NativeValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<NativeValue> {
        Ok(NativeValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<NativeValue> {
        Ok(NativeValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<NativeValue> {
        Ok(NativeValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<NativeValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<NativeValue>
    where
        T: ?Sized + Serialize,
    {
        Ok(NativeValue::object([(variant, to_native_value(value)?)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant<SerializeVec>> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeVec::new(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVariant<SerializeMap>> {
        Ok(SerializeVariant {
            variant,
            inner: SerializeMap::new(),
        })
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: NativeMap::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = NativeValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_native_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<NativeValue> {
        Ok(NativeValue::array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = NativeValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<NativeValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = NativeValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<NativeValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeVariant<SerializeVec> {
    type Ok = NativeValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<NativeValue> {
        let inner = ser::SerializeSeq::end(self.inner)?;
        Ok(NativeValue::object([(self.variant, inner)]))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = NativeValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_native_value(key)? {
            NativeValue::String(s) => s,
            NativeValue::Number(n) => n.to_string(),
            NativeValue::Bool(b) => b.to_string(),
            other => {
                return Err(Error::serialize(format_args!(
                    "map keys must be strings, numbers or booleans, found {}",
                    other.type_name()
                )))
            }
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_native_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<NativeValue> {
        Ok(NativeValue::from(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = NativeValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_native_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<NativeValue> {
        Ok(NativeValue::from(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeVariant<SerializeMap> {
    type Ok = NativeValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<NativeValue> {
        let inner = ser::SerializeStruct::end(self.inner)?;
        Ok(NativeValue::object([(self.variant, inner)]))
    }
}

pub(crate) fn to_native_value<T: Serialize + ?Sized>(value: &T) -> Result<NativeValue> {
    value.serialize(NativeSerializer)
}
