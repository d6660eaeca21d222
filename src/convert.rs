//! Conversion between native values and handle-owned value trees.
//!
//! A [`Converter`] walks depth-first in both directions:
//!
//! - **native → tree**: each container node is created before its children;
//!   every child is converted, then moved into its parent immediately. Until
//!   the move, the child sits in an [`Owned`] guard, so a failure anywhere
//!   releases the partial tree on the way out.
//! - **tree → native**: the native container is created first; children are
//!   detached one at a time, converted, and released before the next sibling.
//!
//! ```rust
//! use serde_gbln::{Allocator, Converter, NativeValue};
//!
//! let alloc = Allocator::new();
//! let converter = Converter::new(&alloc);
//!
//! let user = NativeValue::object([("name", NativeValue::from("Alice"))]);
//! let tree = converter.native_to_tree(&user)?;
//! let back = converter.tree_to_native(tree)?;
//!
//! assert_eq!(back, user);
//! assert_eq!(alloc.stats().live, 0);
//! # Ok::<(), serde_gbln::Error>(())
//! ```

use crate::arena::{Allocator, Handle, Owned};
use crate::de::MAX_DEPTH;
use crate::hint::{TypeHint, ValueType};
use crate::infer::{exact_integer, InferenceStrategy, Inferred, Narrowest};
use crate::native::{NativeMap, NativeValue, Number};
use crate::options::HintPolicy;
use crate::value::GoblinValue;
use crate::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Position of the value being converted, rendered as `user.tags[2]`.
#[derive(Clone, Debug, Default)]
struct Path(Vec<Segment>);

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Path {
    fn locate(&self, err: Error) -> Error {
        if self.0.is_empty() {
            err
        } else {
            err.at_path(&self.to_string())
        }
    }
}

/// Walk state for one native → tree conversion.
struct Walk {
    path: Path,
    // identities of the native containers currently being descended
    in_progress: HashSet<*const ()>,
    // bracket levels the rendered text would open at this point
    depth: usize,
}

/// Converts between [`NativeValue`]s and trees in one allocator.
pub struct Converter<'a, S = Narrowest> {
    alloc: &'a Allocator,
    strategy: S,
    policy: HintPolicy,
}

impl<'a> Converter<'a, Narrowest> {
    /// A converter with narrowest inference and [`HintPolicy::Reinfer`].
    #[must_use]
    pub fn new(alloc: &'a Allocator) -> Self {
        Converter {
            alloc,
            strategy: Narrowest,
            policy: HintPolicy::default(),
        }
    }
}

impl<'a, S: InferenceStrategy> Converter<'a, S> {
    /// Replaces the inference strategy.
    #[must_use]
    pub fn with_strategy<T: InferenceStrategy>(self, strategy: T) -> Converter<'a, T> {
        Converter {
            alloc: self.alloc,
            strategy,
            policy: self.policy,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: HintPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn allocator(&self) -> &'a Allocator {
        self.alloc
    }

    /// Builds a typed tree from a native value.
    ///
    /// # Errors
    ///
    /// - validation errors ([`Error::Range`], [`Error::Length`], [`Error::TypeMismatch`])
    ///   for values that do not fit their hint
    /// - [`Error::Serialize`] for cycles and values with no GBLN mapping, prefixed
    ///   with the path of the offending value
    ///
    /// No node outlives a failed call.
    pub fn native_to_tree(&self, value: &NativeValue) -> Result<Owned<'a>> {
        let before = self.alloc.stats();
        let mut walk = Walk {
            path: Path::default(),
            in_progress: HashSet::new(),
            depth: 0,
        };
        let result = self.build(value, &mut walk);
        match &result {
            Ok(_) => log::debug!(
                "built tree of {} nodes",
                self.alloc.stats().allocated - before.allocated
            ),
            Err(err) => log::debug!("native value rejected at `{}`: {}", walk.path, err),
        }
        result
    }

    fn build(&self, value: &NativeValue, walk: &mut Walk) -> Result<Owned<'a>> {
        let inferred = self
            .strategy
            .classify(value)
            .map_err(|err| walk.path.locate(err))?;
        match (inferred, value) {
            (Inferred::Object, NativeValue::Object(members)) => {
                // the root object is written as bare members
                let levels = usize::from(!walk.path.0.is_empty());
                let identity = Rc::as_ptr(members) as *const ();
                self.enter(identity, levels, walk)?;
                let node = self.alloc.new_object();
                for (key, member) in members.borrow().iter() {
                    walk.path.0.push(Segment::Key(key.clone()));
                    node.insert(key.clone(), self.build(member, walk)?)?;
                    walk.path.0.pop();
                }
                self.leave(identity, levels, walk);
                Ok(node)
            }
            (Inferred::Array, NativeValue::Array(items)) => {
                let identity = Rc::as_ptr(items) as *const ();
                self.enter(identity, 1, walk)?;
                let node = self.alloc.new_array();
                for (index, item) in items.borrow().iter().enumerate() {
                    walk.path.0.push(Segment::Index(index));
                    node.push(self.build(item, walk)?)?;
                    walk.path.0.pop();
                }
                self.leave(identity, 1, walk);
                Ok(node)
            }
            (Inferred::Leaf(hint), value) => self
                .leaf(hint, value.unhinted())
                .map_err(|err| walk.path.locate(err)),
            (_, value) => Err(walk.path.locate(Error::TypeMismatch {
                expected: "container",
                found: value.type_name(),
            })),
        }
    }

    fn enter(&self, identity: *const (), levels: usize, walk: &mut Walk) -> Result<()> {
        if walk.depth + levels > MAX_DEPTH {
            return Err(walk.path.locate(Error::serialize(format_args!(
                "nesting deeper than {} levels",
                MAX_DEPTH
            ))));
        }
        if !walk.in_progress.insert(identity) {
            return Err(walk.path.locate(Error::serialize("circular reference")));
        }
        walk.depth += levels;
        Ok(())
    }

    fn leave(&self, identity: *const (), levels: usize, walk: &mut Walk) {
        walk.in_progress.remove(&identity);
        walk.depth -= levels;
    }

    fn leaf(&self, hint: TypeHint, value: &NativeValue) -> Result<Owned<'a>> {
        let mismatch = |expected: ValueType| Error::TypeMismatch {
            expected: expected.as_str(),
            found: value.type_name(),
        };
        match (hint, value) {
            (TypeHint::Int(kind), NativeValue::Number(n)) => {
                self.alloc.new_integer(kind, exact_integer(n, kind)?)
            }
            (TypeHint::Float(kind), NativeValue::Number(n)) => {
                Ok(self.alloc.new_float(kind, n.as_f64()))
            }
            (TypeHint::Str(tier), NativeValue::String(s)) => {
                self.alloc.new_string(s.as_str(), Some(tier))
            }
            (TypeHint::Bool, NativeValue::Bool(b)) => Ok(self.alloc.new_bool(*b)),
            (TypeHint::Null, NativeValue::Null | NativeValue::Undefined) => {
                Ok(self.alloc.new_null())
            }
            (TypeHint::Int(_), _) => Err(mismatch(ValueType::Integer)),
            (TypeHint::Float(_), _) => Err(mismatch(ValueType::Float)),
            (TypeHint::Str(_), _) => Err(mismatch(ValueType::String)),
            (TypeHint::Bool, _) => Err(mismatch(ValueType::Boolean)),
            (TypeHint::Null, _) => Err(mismatch(ValueType::Null)),
        }
    }

    /// Consumes a tree, returning its native form. Every node is released,
    /// including on error.
    pub fn tree_to_native(&self, root: Owned<'a>) -> Result<NativeValue> {
        let value = self.unbuild(root)?;
        log::debug!("tree consumed, {} nodes live", self.alloc.stats().live);
        Ok(value)
    }

    fn unbuild(&self, node: Owned<'a>) -> Result<NativeValue> {
        let handle = node.handle();
        let value = match self.alloc.type_of(handle)? {
            ValueType::Object => {
                let mut members = NativeMap::new();
                for (key, child) in self.alloc.detach_entries(handle)? {
                    let member = self.unbuild(child)?;
                    members.insert(key, member);
                }
                NativeValue::from(members)
            }
            ValueType::Array => {
                let mut items = Vec::new();
                for child in self.alloc.detach_items(handle)? {
                    items.push(self.unbuild(child)?);
                }
                NativeValue::array(items)
            }
            _ => self
                .alloc
                .with_value(handle, |value| leaf_to_native(value, self.policy))?,
        };
        node.release()?;
        Ok(value)
    }

    /// Reads a tree into native values without consuming it.
    pub fn read_native(&self, handle: Handle) -> Result<NativeValue> {
        match self.alloc.type_of(handle)? {
            ValueType::Object => {
                let mut members = NativeMap::new();
                for key in self.alloc.object_keys(handle)? {
                    let child = self.alloc.object_get(handle, &key)?;
                    members.insert(key, self.read_native(child)?);
                }
                Ok(NativeValue::from(members))
            }
            ValueType::Array => {
                let len = self.alloc.array_len(handle)?;
                let mut items = Vec::with_capacity(len);
                for index in 0..len {
                    items.push(self.read_native(self.alloc.array_get(handle, index)?)?);
                }
                Ok(NativeValue::array(items))
            }
            _ => self
                .alloc
                .with_value(handle, |value| leaf_to_native(value, self.policy)),
        }
    }
}

fn leaf_to_native(value: &GoblinValue, policy: HintPolicy) -> NativeValue {
    let native = match value {
        GoblinValue::Integer(i) => NativeValue::Number(Number::from_i128(i.value())),
        GoblinValue::Float(f) => NativeValue::Number(Number::Float(f.value())),
        GoblinValue::Str(s) => NativeValue::String(s.as_str().to_string()),
        GoblinValue::Bool(b) => NativeValue::Bool(*b),
        GoblinValue::Null | GoblinValue::Object(_) | GoblinValue::Array(_) => NativeValue::Null,
    };
    match (policy, value.hint()) {
        (HintPolicy::Preserve, Some(hint)) => NativeValue::hinted(hint, native),
        _ => native,
    }
}
