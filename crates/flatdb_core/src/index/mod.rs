//! In-memory secondary indexes.
//!
//! Indexes are access paths, rebuilt from the document files on
//! `Collection::init` and maintained on every insert. Nothing about them is
//! persisted.
//!
//! # Index Types
//!
//! - [`HashIndex`]: equality lookup on one field
//!
//! Ordered (range) indexes are not provided. Range comparisons in queries
//! are answered by full scans.

mod hash;

pub use hash::HashIndex;
