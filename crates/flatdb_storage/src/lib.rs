//! # FlatDB Storage
//!
//! File-level primitives for FlatDB collections.
//!
//! A collection directory holds one file per document plus a fixed-width
//! ID counter:
//!
//! ```text
//! <collection>/
//! ├─ id.txt        # 8-byte big-endian u64, the last allocated ID
//! ├─ 1.json        # one serialized envelope per document
//! ├─ 2.json
//! └─ ...
//! ```
//!
//! Nothing in this crate locks. Callers that share a counter or a store
//! between threads serialize access themselves.
//!
//! ## Example
//!
//! ```no_run
//! use flatdb_storage::{DocumentStore, IdCounter};
//! use std::path::Path;
//!
//! let dir = Path::new("users");
//! let mut counter = IdCounter::open(&dir.join("id.txt")).unwrap();
//! let store = DocumentStore::new(dir, "json");
//!
//! let id = counter.allocate().unwrap();
//! store.write(id, br#"{"ID":1,"Data":{}}"#, false).unwrap();
//! assert_eq!(store.read(id).unwrap(), br#"{"ID":1,"Data":{}}"#);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod counter;
mod documents;
mod error;

pub use counter::{IdCounter, COUNTER_WIDTH};
pub use documents::DocumentStore;
pub use error::{StorageError, StorageResult};
