//! Core type definitions for FlatDB.

use std::fmt;

/// Outcome of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InsertResult {
    /// The ID assigned to the new document.
    pub id: u64,
}

impl InsertResult {
    /// Creates a new insert result.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }
}

impl fmt::Display for InsertResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc:{}", self.id)
    }
}
