//! Ordered, duplicate-rejecting map for GBLN objects.
//!
//! [`GoblinMap`] wraps an [`IndexMap`] from keys to child [`Handle`]s. Insertion
//! order is preserved because it is part of the value: a parsed object renders
//! back with its members in the order they were written.
//!
//! Unlike a plain map, inserting an existing key is an error rather than an
//! overwrite, and the map is left untouched.

use crate::{Error, Handle, Result};
use indexmap::IndexMap;

/// An ordered map of string keys to child handles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoblinMap(IndexMap<String, Handle>);

impl GoblinMap {
    #[must_use]
    pub fn new() -> Self {
        GoblinMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        GoblinMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a new key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if the key is already present; the map is unchanged.
    pub fn try_insert(&mut self, key: String, handle: Handle) -> Result<()> {
        if self.0.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }
        self.0.insert(key, handle);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Handle> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Handle> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Handle> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Handle> {
        self.0.iter()
    }

    /// Removes every entry, keeping insertion order in the returned pairs.
    pub(crate) fn drain(&mut self) -> Vec<(String, Handle)> {
        self.0.drain(..).collect()
    }
}

impl IntoIterator for GoblinMap {
    type Item = (String, Handle);
    type IntoIter = indexmap::map::IntoIter<String, Handle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
