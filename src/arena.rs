//! Handle-owned value trees.
//!
//! An [`Allocator`] owns every node of the value trees built in it. Callers see
//! nodes only through opaque [`Handle`]s and follow a single-owner discipline:
//!
//! - each constructor returns an [`Owned`] guard for a new, parentless node;
//! - inserting a node into an object or array transfers it to that container;
//! - releasing a root tears down its whole subtree in one step;
//! - a handle is consumed exactly once, and a released handle is dead for good.
//!
//! ```rust
//! use serde_gbln::{Allocator, IntKind};
//!
//! let alloc = Allocator::new();
//! let user = alloc.new_object();
//! user.insert("id", alloc.new_integer(IntKind::U32, 12345)?)?;
//! user.insert("name", alloc.new_string("Alice", None)?)?;
//!
//! let id = alloc.object_get(user.handle(), "id")?;
//! assert_eq!(alloc.as_integer(id)?.value(), 12345);
//!
//! user.release()?;
//! assert_eq!(alloc.stats().live, 0);
//! # Ok::<(), serde_gbln::Error>(())
//! ```
//!
//! Handles carry the id of their allocator and a slot generation, so a handle
//! used after release or against another allocator is caught as an
//! [`OwnershipError`] instead of reaching a recycled node.
//!
//! `Allocator` is deliberately `!Sync`: all access to one allocator happens
//! on one thread at a time.

use crate::error::OwnershipError;
use crate::hint::{FloatKind, IntKind, StrTier, ValueType};
use crate::value::{BoundedStr, Float, GoblinValue, Integer};
use crate::{Error, GoblinMap, Result};
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ALLOCATOR_ID: AtomicU32 = AtomicU32::new(1);

/// Opaque reference to a node owned by an [`Allocator`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    allocator: u32,
    index: u32,
    generation: u32,
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}.{}", self.allocator, self.index, self.generation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Owner {
    Caller,
    Parent(Handle),
}

#[derive(Debug)]
struct Node {
    value: GoblinValue,
    owner: Owner,
    serial: u64,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Default)]
struct Slots {
    slots: Vec<Slot>,
    free: Vec<u32>,
    next_serial: u64,
    allocated: u64,
    freed: u64,
}

impl Slots {
    fn node(&self, allocator: u32, handle: Handle) -> Result<&Node> {
        check_allocator(allocator, handle)?;
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or_else(|| OwnershipError::Released(handle.to_string()).into())
    }

    fn node_mut(&mut self, allocator: u32, handle: Handle) -> Result<&mut Node> {
        check_allocator(allocator, handle)?;
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| OwnershipError::Released(handle.to_string()).into())
    }

    /// Frees one node and bumps its slot generation. Returns the node's children.
    fn free(&mut self, handle: Handle) -> Vec<Handle> {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return Vec::new();
        };
        let children = match slot.node.take() {
            Some(node) => node.value.children(),
            None => return Vec::new(),
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.freed += 1;
        log::trace!("freed node {}", handle);
        children
    }
}

fn check_allocator(allocator: u32, handle: Handle) -> Result<()> {
    if handle.allocator == allocator {
        Ok(())
    } else {
        Err(OwnershipError::ForeignAllocator {
            handle: handle.to_string(),
            owner: handle.allocator,
            used_with: allocator,
        }
        .into())
    }
}

/// Counters for leak checks: every allocated node must eventually be freed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AllocatorStats {
    pub allocated: u64,
    pub freed: u64,
    pub live: usize,
}

/// Owner of value-tree nodes. See the [module docs](self).
#[derive(Debug)]
pub struct Allocator {
    id: u32,
    slots: RefCell<Slots>,
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator {
    #[must_use]
    pub fn new() -> Self {
        Allocator {
            id: NEXT_ALLOCATOR_ID.fetch_add(1, Ordering::Relaxed),
            slots: RefCell::new(Slots::default()),
        }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn stats(&self) -> AllocatorStats {
        let slots = self.slots.borrow();
        AllocatorStats {
            allocated: slots.allocated,
            freed: slots.freed,
            live: (slots.allocated - slots.freed) as usize,
        }
    }

    fn alloc(&self, value: GoblinValue) -> Owned<'_> {
        let mut slots = self.slots.borrow_mut();
        let serial = slots.next_serial;
        slots.next_serial += 1;
        slots.allocated += 1;
        let node = Node {
            value,
            owner: Owner::Caller,
            serial,
        };
        let (index, generation) = match slots.free.pop() {
            Some(index) => {
                let slot = &mut slots.slots[index as usize];
                slot.node = Some(node);
                (index, slot.generation)
            }
            None => {
                let index = slots.slots.len() as u32;
                slots.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                (index, 0)
            }
        };
        let handle = Handle {
            allocator: self.id,
            index,
            generation,
        };
        log::trace!("allocated node {}", handle);
        Owned::new(self, handle)
    }

    /// Creates an integer node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] if `raw` does not fit `kind`; no node is allocated.
    pub fn new_integer(&self, kind: IntKind, raw: i128) -> Result<Owned<'_>> {
        let value = Integer::new(kind, raw)?;
        Ok(self.alloc(GoblinValue::Integer(value)))
    }

    pub fn new_float(&self, kind: FloatKind, raw: f64) -> Owned<'_> {
        self.alloc(GoblinValue::Float(Float::new(kind, raw)))
    }

    /// Creates a bounded string node, in `tier` or in the smallest tier that fits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Length`] if the text does not fit; no node is allocated.
    pub fn new_string(&self, text: impl Into<String>, tier: Option<StrTier>) -> Result<Owned<'_>> {
        let value = BoundedStr::new(text, tier)?;
        Ok(self.alloc(GoblinValue::Str(value)))
    }

    pub fn new_bool(&self, value: bool) -> Owned<'_> {
        self.alloc(GoblinValue::Bool(value))
    }

    pub fn new_null(&self) -> Owned<'_> {
        self.alloc(GoblinValue::Null)
    }

    pub fn new_object(&self) -> Owned<'_> {
        self.alloc(GoblinValue::Object(GoblinMap::new()))
    }

    pub fn new_array(&self) -> Owned<'_> {
        self.alloc(GoblinValue::Array(Vec::new()))
    }

    /// Checks that `child` may be adopted by `container`.
    fn check_adoptable(&self, slots: &Slots, container: Handle, child: Handle) -> Result<()> {
        let parent = slots.node(self.id, container)?;
        let node = slots.node(self.id, child)?;
        if node.owner != Owner::Caller {
            return Err(OwnershipError::Transferred(child.to_string()).into());
        }
        if node.serial <= parent.serial {
            return Err(OwnershipError::CreationOrder {
                container: container.to_string(),
                child: child.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Inserts `child` under `key`, transferring ownership to the object.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] if `object` is not an object
    /// - [`Error::DuplicateKey`] if `key` is present; the object is unchanged
    /// - [`Error::Ownership`] if either handle is dead or foreign, or `child`
    ///   already has a parent or was created before `object`
    ///
    /// On error the caller still owns `child`.
    pub fn object_insert(&self, object: Handle, key: impl Into<String>, child: Handle) -> Result<()> {
        let mut slots = self.slots.borrow_mut();
        self.check_adoptable(&slots, object, child)?;
        let parent = slots.node_mut(self.id, object)?;
        match &mut parent.value {
            GoblinValue::Object(map) => map.try_insert(key.into(), child)?,
            other => return Err(other.mismatch(ValueType::Object)),
        }
        slots.node_mut(self.id, child)?.owner = Owner::Parent(object);
        Ok(())
    }

    /// Appends `child`, transferring ownership to the array.
    ///
    /// # Errors
    ///
    /// As [`Allocator::object_insert`], minus the duplicate-key case.
    pub fn array_push(&self, array: Handle, child: Handle) -> Result<()> {
        let mut slots = self.slots.borrow_mut();
        self.check_adoptable(&slots, array, child)?;
        let parent = slots.node_mut(self.id, array)?;
        match &mut parent.value {
            GoblinValue::Array(items) => items.push(child),
            other => return Err(other.mismatch(ValueType::Array)),
        }
        slots.node_mut(self.id, child)?.owner = Owner::Parent(array);
        Ok(())
    }

    /// Releases a parentless node together with everything it contains.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Ownership`] if the handle was already released, belongs to
    /// another allocator, or is owned by a container (release its root instead).
    pub fn release(&self, handle: Handle) -> Result<()> {
        let mut slots = self.slots.borrow_mut();
        let owner = match slots.node(self.id, handle) {
            Ok(node) => node.owner,
            Err(err) => {
                log::error!("release of {} rejected: {}", handle, err);
                return Err(err);
            }
        };
        if let Owner::Parent(parent) = owner {
            let err = Error::from(OwnershipError::Transferred(handle.to_string()));
            log::error!("release of {} rejected: owned by {}", handle, parent);
            return Err(err);
        }
        let mut pending = vec![handle];
        while let Some(next) = pending.pop() {
            pending.extend(slots.free(next));
        }
        Ok(())
    }

    /// Detaches every entry of a caller-owned object, handing each back to the caller.
    ///
    /// The object is left empty. Entries come back in insertion order.
    pub fn detach_entries(&self, object: Handle) -> Result<Vec<(String, Owned<'_>)>> {
        let entries = {
            let mut slots = self.slots.borrow_mut();
            let node = slots.node_mut(self.id, object)?;
            if node.owner != Owner::Caller {
                return Err(OwnershipError::Transferred(object.to_string()).into());
            }
            let entries = match &mut node.value {
                GoblinValue::Object(map) => map.drain(),
                other => return Err(other.mismatch(ValueType::Object)),
            };
            for (_, child) in &entries {
                slots.node_mut(self.id, *child)?.owner = Owner::Caller;
            }
            entries
        };
        Ok(entries
            .into_iter()
            .map(|(key, child)| (key, Owned::new(self, child)))
            .collect())
    }

    /// Detaches every item of a caller-owned array, handing each back to the caller.
    pub fn detach_items(&self, array: Handle) -> Result<Vec<Owned<'_>>> {
        let items = {
            let mut slots = self.slots.borrow_mut();
            let node = slots.node_mut(self.id, array)?;
            if node.owner != Owner::Caller {
                return Err(OwnershipError::Transferred(array.to_string()).into());
            }
            let items = match &mut node.value {
                GoblinValue::Array(items) => std::mem::take(items),
                other => return Err(other.mismatch(ValueType::Array)),
            };
            for child in &items {
                slots.node_mut(self.id, *child)?.owner = Owner::Caller;
            }
            items
        };
        Ok(items
            .into_iter()
            .map(|child| Owned::new(self, child))
            .collect())
    }

    /// Runs `f` against a live node's value.
    pub(crate) fn with_value<R>(&self, handle: Handle, f: impl FnOnce(&GoblinValue) -> R) -> Result<R> {
        let slots = self.slots.borrow();
        let node = slots.node(self.id, handle)?;
        Ok(f(&node.value))
    }

    pub fn type_of(&self, handle: Handle) -> Result<ValueType> {
        self.with_value(handle, GoblinValue::value_type)
    }

    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] unless the node is an integer.
    pub fn as_integer(&self, handle: Handle) -> Result<Integer> {
        self.with_value(handle, |value| match value {
            GoblinValue::Integer(i) => Ok(*i),
            other => Err(other.mismatch(ValueType::Integer)),
        })?
    }

    pub fn as_float(&self, handle: Handle) -> Result<Float> {
        self.with_value(handle, |value| match value {
            GoblinValue::Float(f) => Ok(*f),
            other => Err(other.mismatch(ValueType::Float)),
        })?
    }

    pub fn as_str(&self, handle: Handle) -> Result<BoundedStr> {
        self.with_value(handle, |value| match value {
            GoblinValue::Str(s) => Ok(s.clone()),
            other => Err(other.mismatch(ValueType::String)),
        })?
    }

    pub fn as_bool(&self, handle: Handle) -> Result<bool> {
        self.with_value(handle, |value| match value {
            GoblinValue::Bool(b) => Ok(*b),
            other => Err(other.mismatch(ValueType::Boolean)),
        })?
    }

    /// Keys of an object, in insertion order.
    pub fn object_keys(&self, handle: Handle) -> Result<Vec<String>> {
        self.with_value(handle, |value| match value {
            GoblinValue::Object(map) => Ok(map.keys().cloned().collect()),
            other => Err(other.mismatch(ValueType::Object)),
        })?
    }

    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the object has no such key.
    pub fn object_get(&self, handle: Handle, key: &str) -> Result<Handle> {
        self.with_value(handle, |value| match value {
            GoblinValue::Object(map) => map
                .get(key)
                .copied()
                .ok_or_else(|| Error::KeyNotFound(key.to_string())),
            other => Err(other.mismatch(ValueType::Object)),
        })?
    }

    pub fn array_len(&self, handle: Handle) -> Result<usize> {
        self.with_value(handle, |value| match value {
            GoblinValue::Array(items) => Ok(items.len()),
            other => Err(other.mismatch(ValueType::Array)),
        })?
    }

    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= array_len`.
    pub fn array_get(&self, handle: Handle, index: usize) -> Result<Handle> {
        self.with_value(handle, |value| match value {
            GoblinValue::Array(items) => items.get(index).copied().ok_or(Error::IndexOutOfRange {
                index,
                len: items.len(),
            }),
            other => Err(other.mismatch(ValueType::Array)),
        })?
    }
}

impl Drop for Allocator {
    fn drop(&mut self) {
        let live = self.stats().live;
        if live > 0 {
            log::warn!("allocator #{} dropped with {} live nodes", self.id, live);
        }
    }
}

/// Scoped ownership of one parentless node.
///
/// Exactly one of these ends the guard: [`Owned::release`], a successful
/// transfer through [`Owned::insert`] / [`Owned::push`], [`Owned::into_handle`]
/// (the caller takes over), or `Drop`, which releases whatever is still held.
/// `Drop` is the safety net for early returns and `?`; the explicit paths are
/// the normal ones.
pub struct Owned<'a> {
    alloc: &'a Allocator,
    handle: Handle,
    armed: bool,
}

impl<'a> Owned<'a> {
    fn new(alloc: &'a Allocator, handle: Handle) -> Self {
        Owned {
            alloc,
            handle,
            armed: true,
        }
    }

    /// Takes scoped ownership of a raw handle previously given out by [`Owned::into_handle`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Ownership`] if the handle is dead, foreign, or has a parent.
    pub fn adopt(alloc: &'a Allocator, handle: Handle) -> Result<Self> {
        let owner = alloc
            .slots
            .borrow()
            .node(alloc.id, handle)
            .map(|node| node.owner)?;
        if owner != Owner::Caller {
            return Err(OwnershipError::Transferred(handle.to_string()).into());
        }
        Ok(Owned::new(alloc, handle))
    }

    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[must_use]
    pub fn allocator(&self) -> &'a Allocator {
        self.alloc
    }

    /// Gives up scoped ownership; the caller must release the handle itself.
    #[must_use = "the returned handle must be released"]
    pub fn into_handle(mut self) -> Handle {
        self.disarm()
    }

    fn disarm(&mut self) -> Handle {
        self.armed = false;
        self.handle
    }

    /// Releases the node and its subtree now.
    pub fn release(mut self) -> Result<()> {
        let handle = self.disarm();
        self.alloc.release(handle)
    }

    /// Moves `child` into this object under `key`.
    ///
    /// On failure `child` is released before the error is returned.
    pub fn insert(&self, key: impl Into<String>, mut child: Owned<'a>) -> Result<()> {
        self.alloc.object_insert(self.handle(), key, child.handle())?;
        child.disarm();
        Ok(())
    }

    /// Moves `child` to the end of this array.
    ///
    /// On failure `child` is released before the error is returned.
    pub fn push(&self, mut child: Owned<'a>) -> Result<()> {
        self.alloc.array_push(self.handle(), child.handle())?;
        child.disarm();
        Ok(())
    }
}

impl fmt::Debug for Owned<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owned")
            .field("handle", &self.handle)
            .field("armed", &self.armed)
            .finish()
    }
}

impl Drop for Owned<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.armed = false;
            log::debug!("releasing {} on scope exit", self.handle);
            if let Err(err) = self.alloc.release(self.handle) {
                log::error!("scope-exit release of {} failed: {}", self.handle, err);
            }
        }
    }
}
