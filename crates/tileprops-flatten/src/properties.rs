//! Flattened property map

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Dotted-path keyed feature properties
///
/// Values borrow from the document they were flattened out of; only injected
/// metadata is owned. Iteration follows insertion order, which is the
/// pre-order walk of the source tree followed by computed fields and
/// metadata. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlatProperties<'a> {
    entries: IndexMap<String, Cow<'a, Value>>,
}

impl<'a> FlatProperties<'a> {
    /// Create empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value borrowed from the source document
    ///
    /// An existing entry under `key` is replaced in place.
    #[inline]
    pub fn insert_borrowed(&mut self, key: impl Into<String>, value: &'a Value) {
        self.entries.insert(key.into(), Cow::Borrowed(value));
    }

    /// Insert an owned value
    #[inline]
    pub fn insert_owned(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), Cow::Owned(value));
    }

    /// Remove an entry, keeping the order of the rest
    pub fn remove(&mut self, key: &str) -> Option<Cow<'a, Value>> {
        self.entries.shift_remove(key)
    }

    /// Get value at dotted key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|v| &**v)
    }

    /// Check whether `key` is present
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Check whether the entry under `key` still points into the source document
    #[inline]
    #[must_use]
    pub fn is_borrowed(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(Cow::Borrowed(_)))
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if map is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.shortened().keys().map(String::as_str)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.shortened().iter().map(|(k, v)| (k.as_str(), &**v))
    }

    /// Entries viewed at the lifetime of `&self`, so returned iterators
    /// only capture that one lifetime.
    fn shortened(&self) -> &IndexMap<String, Cow<'_, Value>> {
        &self.entries
    }

    /// Detach from the source document
    #[must_use]
    pub fn into_owned(self) -> Map<String, Value> {
        self.entries
            .into_iter()
            .map(|(k, v)| (k, v.into_owned()))
            .collect()
    }
}
