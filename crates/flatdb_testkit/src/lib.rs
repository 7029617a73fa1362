//! # FlatDB Testkit
//!
//! Test utilities for FlatDB.
//!
//! This crate provides:
//! - Temporary databases and a sample [`Record`] payload
//! - Property-based test generators using proptest
//! - An integration harness with a reference query evaluator
//! - Concurrent stress drivers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flatdb_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_database() {
//!     let (_db, records) = scenarios::populated(10);
//!     assert_eq!(records.count().unwrap(), 10);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use stress::*;
