//! Hash index implementation.

use crate::collection::Document;
use flatdb_codec::{Envelope, Value};
use std::collections::HashMap;

/// Unordered equality index over one payload field.
///
/// Maps each observed field value to the IDs of the documents holding it.
/// Buckets keep insertion order. A document whose payload has no usable
/// value for the field is left out of the index.
///
/// # Example
///
/// ```rust,ignore
/// let mut index = HashIndex::new("name");
///
/// index.update(1, &user);
///
/// let ids = index.lookup(&Value::from("alice"));
/// ```
#[derive(Debug, Clone)]
pub struct HashIndex {
    /// Indexed field name.
    field: String,
    /// Field value to document IDs.
    entries: HashMap<Value, Vec<u64>>,
    /// Total entry count.
    count: usize,
}

impl HashIndex {
    /// Creates an empty index on `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            entries: HashMap::new(),
            count: 0,
        }
    }

    /// Returns the indexed field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Indexes every envelope in iteration order.
    pub fn build<'a, T, I>(&mut self, documents: I)
    where
        T: Document + 'a,
        I: IntoIterator<Item = &'a Envelope<T>>,
    {
        for doc in documents {
            self.update(doc.id, &doc.data);
        }
    }

    /// Indexes a single document.
    ///
    /// Returns false when the payload has no value for the field.
    pub fn update<T: Document>(&mut self, id: u64, payload: &T) -> bool {
        match payload.field(&self.field) {
            Some(value) => {
                self.insert(value, id);
                true
            }
            None => false,
        }
    }

    /// Appends `id` to the bucket for `key`.
    pub fn insert(&mut self, key: Value, id: u64) {
        self.entries.entry(key).or_default().push(id);
        self.count += 1;
    }

    /// Looks up the IDs holding exactly `key`.
    ///
    /// Returns `None` if the value was never observed.
    pub fn lookup(&self, key: &Value) -> Option<&[u64]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Checks if the index has a bucket for `key`.
    pub fn contains(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of indexed documents.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of distinct values.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Clears the index.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.count = 0;
    }
}
